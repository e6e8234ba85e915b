//! Open positions from `about.json`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{ContentError, require};

/// Category id that matches every job.
pub const ALL_CATEGORY: &str = "all";

/// Jobs shown before "show more".
pub const COLLAPSED_LIMIT: usize = 5;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Job {
    pub position: String,
    pub department: String,
    /// Full-time, part-time, contract.
    pub commitment: String,
    pub location: String,
    /// Id of a [`JobCategory`].
    pub category: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct JobCategory {
    pub id: String,
    pub label: String,
}

/// Careers data. Other sections of `about.json` are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutData {
    #[serde(default)]
    pub jobs: Vec<Job>,
    #[serde(default)]
    pub job_categories: Vec<JobCategory>,
}

impl AboutData {
    /// Check that categories are unique and every job uses a declared one.
    pub fn validate(&self) -> Result<(), ContentError> {
        let mut ids = HashSet::new();
        for category in &self.job_categories {
            require(&category.id, "jobCategories", "id")?;
            require(&category.label, &format!("jobCategories '{}'", category.id), "label")?;
            if !ids.insert(category.id.as_str()) {
                return Err(ContentError::invalid(
                    "jobCategories",
                    format!("category '{}' is declared twice", category.id),
                ));
            }
        }

        for (index, job) in self.jobs.iter().enumerate() {
            let record = format!("jobs[{index}]");
            require(&job.position, &record, "position")?;
            require(&job.department, &record, "department")?;
            require(&job.commitment, &record, "commitment")?;
            require(&job.location, &record, "location")?;
            if job.category == ALL_CATEGORY || !ids.contains(job.category.as_str()) {
                return Err(ContentError::invalid(
                    record,
                    format!("category '{}' is not declared in jobCategories", job.category),
                ));
            }
        }
        Ok(())
    }
}

/// Filterable, collapsible job list.
#[derive(Debug)]
pub struct JobBoard<'a> {
    jobs: &'a [Job],
    category: String,
    expanded: bool,
}

impl<'a> JobBoard<'a> {
    /// Board showing all categories, collapsed.
    pub fn new(jobs: &'a [Job]) -> Self {
        Self {
            jobs,
            category: ALL_CATEGORY.to_owned(),
            expanded: false,
        }
    }

    /// Switch the category filter. Expansion is kept.
    pub fn select(&mut self, category: impl Into<String>) {
        self.category = category.into();
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn toggle_expanded(&mut self) {
        self.expanded = !self.expanded;
    }

    /// Jobs matching the current category.
    pub fn filtered(&self) -> Vec<&'a Job> {
        self.jobs
            .iter()
            .filter(|job| self.category == ALL_CATEGORY || job.category == self.category)
            .collect()
    }

    /// Jobs to show: the first five matches unless expanded.
    pub fn displayed(&self) -> Vec<&'a Job> {
        let mut jobs = self.filtered();
        if !self.expanded {
            jobs.truncate(COLLAPSED_LIMIT);
        }
        jobs
    }

    /// Whether more matches exist than the collapsed view shows.
    pub fn has_more(&self) -> bool {
        self.filtered().len() > COLLAPSED_LIMIT
    }
}
