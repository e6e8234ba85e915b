//! `tb content` command implementations.

use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{Args, Subcommand};
use tb_config::Config;
use tb_content::{
    BillingCycle, ChangeFreq, ContactMessage, FaqAccordion, JobBoard, PricingData, SiteContent,
    Sitemap,
};
use tb_viewer::DocRegistry;

use crate::error::CliError;
use crate::output::Output;

/// Priority of documentation pages in the sitemap.
const DOCS_PRIORITY: f32 = 0.6;

/// Site content commands.
#[derive(Subcommand)]
pub(crate) enum ContentCommand {
    /// List open positions.
    Jobs(JobsArgs),
    /// Show the FAQ accordion.
    Faq(FaqArgs),
    /// Show pricing plans.
    Pricing(PricingArgs),
    /// Render a blog post, or list posts when no slug is given.
    Blog(BlogArgs),
    /// Load and validate every content file.
    Check(CommonArgs),
    /// Write sitemap.xml.
    Sitemap(SitemapArgs),
    /// Build a mailto link for a contact form submission.
    Mailto(MailtoArgs),
}

impl ContentCommand {
    /// Execute the content command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        match self {
            Self::Jobs(args) => args.execute(),
            Self::Faq(args) => args.execute(),
            Self::Pricing(args) => args.execute(),
            Self::Blog(args) => args.execute(),
            Self::Check(args) => check(&args),
            Self::Sitemap(args) => args.execute(),
            Self::Mailto(args) => args.execute(),
        }
    }
}

/// Options shared by every content command.
#[derive(Args)]
pub(crate) struct CommonArgs {
    /// Path to configuration file (default: auto-discover tb.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory with about.json, pricing.json and blog.json (overrides config).
    #[arg(short, long)]
    data_dir: Option<PathBuf>,
}

impl CommonArgs {
    fn load_config(&self) -> Result<Config, CliError> {
        Ok(Config::load(self.config.as_deref(), None)?)
    }

    fn data_dir(&self, config: &Config) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| config.content_resolved.data_dir.clone())
    }

    fn load_content(&self) -> Result<SiteContent, CliError> {
        let config = self.load_config()?;
        Ok(SiteContent::load(&self.data_dir(&config))?)
    }
}

/// Arguments for `content jobs`.
#[derive(Args)]
pub(crate) struct JobsArgs {
    /// Category id to filter by.
    #[arg(long, default_value = tb_content::ALL_CATEGORY)]
    category: String,

    /// Show every match instead of the first five.
    #[arg(long)]
    all: bool,

    #[command(flatten)]
    common: CommonArgs,
}

impl JobsArgs {
    fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let content = self.common.load_content()?;
        for line in job_lines(&content, &self.category, self.all) {
            output.print(&line);
        }
        Ok(())
    }
}

fn job_lines(content: &SiteContent, category: &str, expanded: bool) -> Vec<String> {
    let mut board = JobBoard::new(&content.about.jobs);
    board.select(category);
    if expanded {
        board.toggle_expanded();
    }

    let mut lines: Vec<String> = board
        .displayed()
        .iter()
        .map(|job| {
            format!(
                "{} | {} | {} | {}",
                job.position, job.department, job.commitment, job.location
            )
        })
        .collect();
    if lines.is_empty() {
        lines.push("No open positions in this category.".to_owned());
    } else if board.has_more() && !board.is_expanded() {
        let hidden = board.filtered().len() - lines.len();
        lines.push(format!("... {hidden} more (use --all)"));
    }
    lines
}

/// Arguments for `content faq`.
#[derive(Args)]
pub(crate) struct FaqArgs {
    /// Click the entry at this index; repeat to click several times.
    #[arg(long)]
    click: Vec<usize>,

    #[command(flatten)]
    common: CommonArgs,
}

impl FaqArgs {
    fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let content = self.common.load_content()?;

        let mut accordion = FaqAccordion::new(content.pricing.faqs.len());
        for index in self.click {
            accordion.click(index);
        }

        for (index, faq) in content.pricing.faqs.iter().enumerate() {
            if accordion.is_open(index) {
                output.highlight(&format!("[-] {}", faq.question));
                output.print(&format!("    {}", faq.answer));
            } else {
                output.print(&format!("[+] {}", faq.question));
            }
        }
        Ok(())
    }
}

/// Arguments for `content pricing`.
#[derive(Args)]
pub(crate) struct PricingArgs {
    /// Show annual prices.
    #[arg(long)]
    annual: bool,

    #[command(flatten)]
    common: CommonArgs,
}

impl PricingArgs {
    fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let content = self.common.load_content()?;
        let cycle = if self.annual {
            BillingCycle::Annual
        } else {
            BillingCycle::Monthly
        };

        for (index, plan) in pricing_cards(&content.pricing, cycle).into_iter().enumerate() {
            if index > 0 {
                output.gap();
            }
            let [title, rest @ ..] = plan.as_slice() else {
                continue;
            };
            output.highlight(title);
            for line in rest {
                output.print(line);
            }
        }
        Ok(())
    }
}

/// Lines of each plan card: title, price, description, features, button.
fn pricing_cards(pricing: &PricingData, cycle: BillingCycle) -> Vec<Vec<String>> {
    pricing
        .plans
        .iter()
        .map(|plan| {
            let mut title = plan.name.clone();
            if plan.popular {
                title.push_str(" (Most Popular)");
            }
            let mut card = vec![
                title,
                format!("  {}", plan.quote(cycle)),
                format!("  {}", plan.description),
            ];
            card.extend(plan.features.iter().map(|f| format!("  - {f}")));
            card.push(format!("  [{}] -> {}", plan.cta_text, plan.cta_href()));
            card
        })
        .collect()
}

/// Arguments for `content blog`.
#[derive(Args)]
pub(crate) struct BlogArgs {
    /// Post slug.
    slug: Option<String>,

    /// Only list posts in this category.
    #[arg(long)]
    category: Option<String>,

    /// Print markdown instead of HTML.
    #[arg(long)]
    markdown: bool,

    #[command(flatten)]
    common: CommonArgs,
}

impl BlogArgs {
    fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let content = self.common.load_content()?;
        let blog = &content.blog;

        let Some(slug) = &self.slug else {
            let posts: Vec<_> = match &self.category {
                Some(category) => blog.by_category(category).collect(),
                None => blog.all_posts().collect(),
            };
            for post in posts {
                output.print(&format!("{}  {}", post.slug, post.title));
                output.muted(&format!("    {} · {}", post.date, post.category));
            }
            return Ok(());
        };

        let post = blog
            .find(slug)
            .ok_or_else(|| CliError::Validation(format!("No blog post with slug '{slug}'")))?;
        if self.markdown {
            output.print(&post.to_markdown());
        } else {
            output.print(&post.to_html());
        }
        Ok(())
    }
}

fn check(args: &CommonArgs) -> Result<(), CliError> {
    let output = Output::new();
    let config = args.load_config()?;
    let data_dir = args.data_dir(&config);
    let content = SiteContent::load(&data_dir)?;

    output.success(&format!("Content in {} is valid", data_dir.display()));
    output.info(&format!(
        "  {} jobs in {} categories",
        content.about.jobs.len(),
        content.about.job_categories.len()
    ));
    output.info(&format!(
        "  {} plans, {} FAQs",
        content.pricing.plans.len(),
        content.pricing.faqs.len()
    ));
    output.info(&format!(
        "  {} blog posts",
        content.blog.all_posts().count()
    ));
    Ok(())
}

/// Arguments for `content sitemap`.
#[derive(Args)]
pub(crate) struct SitemapArgs {
    /// Write to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover tb.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl SitemapArgs {
    fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref(), None)?;
        let registry = DocRegistry::from_config(&config.docs_resolved);

        let xml = build_sitemap(&config.site.base_url, &registry).to_xml()?;
        match &self.output {
            Some(path) => {
                write_file(path, &xml)?;
                output.success(&format!("Wrote {}", path.display()));
            }
            None => output.print(&xml),
        }
        Ok(())
    }
}

/// Site pages followed by one entry per documentation page under `/docs`.
fn build_sitemap(base_url: &str, registry: &DocRegistry) -> Sitemap {
    let mut sitemap = Sitemap::site(base_url, Utc::now());
    for doc in registry.pages() {
        let path = format!("/docs{}", registry.path_for(&doc.id));
        sitemap.add(&path, ChangeFreq::Weekly, DOCS_PRIORITY);
    }
    sitemap
}

fn write_file(path: &Path, contents: &str) -> Result<(), CliError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)?;
    Ok(())
}

/// Arguments for `content mailto`.
#[derive(Args)]
pub(crate) struct MailtoArgs {
    #[arg(long)]
    name: String,

    #[arg(long)]
    email: String,

    #[arg(long)]
    subject: String,

    #[arg(long)]
    message: String,

    /// Recipient (default: site.contact_email).
    #[arg(long)]
    to: Option<String>,

    /// Path to configuration file (default: auto-discover tb.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl MailtoArgs {
    fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let to = match self.to {
            Some(to) => to,
            None => Config::load(self.config.as_deref(), None)?.site.contact_email,
        };

        let message = ContactMessage {
            name: self.name,
            email: self.email,
            subject: self.subject,
            message: self.message,
        };
        message.validate()?;
        output.print(&message.mailto(&to));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tb_content::{AboutData, BlogData, Job, JobCategory, Plan};
    use tb_viewer::DocumentDescriptor;

    use super::*;

    fn content(job_count: usize) -> SiteContent {
        let jobs = (1..=job_count)
            .map(|i| Job {
                position: format!("Engineer {i}"),
                department: "Engineering".to_owned(),
                commitment: "Full-time".to_owned(),
                location: "Remote".to_owned(),
                category: "engineering".to_owned(),
            })
            .collect();
        let blog = featured_only_blog();
        SiteContent {
            about: AboutData {
                jobs,
                job_categories: vec![JobCategory {
                    id: "engineering".to_owned(),
                    label: "Engineering".to_owned(),
                }],
            },
            pricing: PricingData::default(),
            blog,
        }
    }

    fn featured_only_blog() -> BlogData {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("blog.json");
        std::fs::write(
            &path,
            r#"{"featuredPost": {"slug": "hello", "title": "Hello", "excerpt": "Hi.",
                "date": "2025-01-01", "readTime": "1 min read", "category": "News"}}"#,
        )
        .unwrap();
        tb_content::read_json(&path).unwrap()
    }

    #[test]
    fn test_job_lines_collapsed() {
        let lines = job_lines(&content(7), "all", false);

        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "Engineer 1 | Engineering | Full-time | Remote");
        assert_eq!(lines[5], "... 2 more (use --all)");
    }

    #[test]
    fn test_job_lines_expanded() {
        let lines = job_lines(&content(7), "engineering", true);
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[6], "Engineer 7 | Engineering | Full-time | Remote");
    }

    #[test]
    fn test_job_lines_empty_category() {
        assert_eq!(
            job_lines(&content(3), "legal", false),
            ["No open positions in this category."]
        );
    }

    #[test]
    fn test_pricing_cards() {
        let pricing = PricingData {
            plans: vec![Plan {
                id: "pro".to_owned(),
                name: "Professional".to_owned(),
                description: "For practitioners".to_owned(),
                monthly_price: 29.0,
                annual_price: 290.0,
                features: vec!["Citations".to_owned()],
                cta_text: "Go Pro".to_owned(),
                cta_link: Some("/register".to_owned()),
                popular: true,
                coming_soon: false,
            }],
            faqs: Vec::new(),
        };

        assert_eq!(
            pricing_cards(&pricing, BillingCycle::Annual),
            [[
                "Professional (Most Popular)",
                "  $290/yr",
                "  For practitioners",
                "  - Citations",
                "  [Go Pro] -> /register",
            ]]
        );
    }

    #[test]
    fn test_build_sitemap_includes_docs() {
        let registry = DocRegistry::new(
            "home",
            vec![
                DocumentDescriptor::new("home", "Documentation Home", None),
                DocumentDescriptor::new("deployment", "Deployment", Some("deployment.md")),
            ],
        );

        let sitemap = build_sitemap("https://taxobuddy.ai", &registry);
        let last = sitemap.entries().last().unwrap();

        assert_eq!(sitemap.entries().len(), 6);
        assert_eq!(last.loc, "https://taxobuddy.ai/docs/deployment");
        assert_eq!(last.changefreq, ChangeFreq::Weekly);
    }

    #[test]
    fn test_write_file_creates_parent() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("public/sitemap.xml");

        write_file(&path, "<urlset/>").unwrap();

        assert_eq!(std::fs::read_to_string(path).unwrap(), "<urlset/>");
    }
}
