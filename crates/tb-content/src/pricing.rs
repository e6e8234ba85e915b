//! Plans and FAQs from `pricing.json`.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ContentError, require};

/// Where plan buttons lead when a plan has no link of its own.
pub const SIGNUP_URL: &str = "https://chat.taxobuddy.ai/auth/signup";

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: String,
    pub name: String,
    pub description: String,
    pub monthly_price: f64,
    pub annual_price: f64,
    #[serde(default)]
    pub features: Vec<String>,
    pub cta_text: String,
    #[serde(default)]
    pub cta_link: Option<String>,
    #[serde(default)]
    pub popular: bool,
    #[serde(default)]
    pub coming_soon: bool,
}

impl Plan {
    #[must_use]
    pub fn quote(&self, cycle: BillingCycle) -> PlanQuote {
        PlanQuote {
            price: match cycle {
                BillingCycle::Monthly => self.monthly_price,
                BillingCycle::Annual => self.annual_price,
            },
            period: cycle.period(),
            coming_soon: self.coming_soon,
        }
    }

    /// Call-to-action target; unreleased plans link nowhere.
    #[must_use]
    pub fn cta_href(&self) -> &str {
        if self.coming_soon {
            "#"
        } else {
            self.cta_link.as_deref().unwrap_or(SIGNUP_URL)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct PricingData {
    #[serde(default)]
    pub plans: Vec<Plan>,
    #[serde(default)]
    pub faqs: Vec<Faq>,
}

impl PricingData {
    pub fn validate(&self) -> Result<(), ContentError> {
        let mut ids = HashSet::new();
        for plan in &self.plans {
            require(&plan.id, "plans", "id")?;
            let record = format!("plans '{}'", plan.id);
            require(&plan.name, &record, "name")?;
            require(&plan.cta_text, &record, "ctaText")?;
            for (field, price) in [
                ("monthlyPrice", plan.monthly_price),
                ("annualPrice", plan.annual_price),
            ] {
                if !price.is_finite() || price < 0.0 {
                    return Err(ContentError::invalid(
                        &record,
                        format!("{field} must be a non-negative number, got {price}"),
                    ));
                }
            }
            if !ids.insert(plan.id.as_str()) {
                return Err(ContentError::invalid(&record, "id is duplicated"));
            }
        }

        for (index, faq) in self.faqs.iter().enumerate() {
            let record = format!("faqs[{index}]");
            require(&faq.question, &record, "question")?;
            require(&faq.answer, &record, "answer")?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BillingCycle {
    #[default]
    Monthly,
    Annual,
}

impl BillingCycle {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Monthly => Self::Annual,
            Self::Annual => Self::Monthly,
        }
    }

    /// Suffix shown after the price.
    #[must_use]
    pub fn period(self) -> &'static str {
        match self {
            Self::Monthly => "/mo",
            Self::Annual => "/yr",
        }
    }
}

/// Price of a plan for one billing cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlanQuote {
    pub price: f64,
    pub period: &'static str,
    pub coming_soon: bool,
}

impl PlanQuote {
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.price.abs() < f64::EPSILON
    }
}

impl fmt::Display for PlanQuote {
    /// `Coming Soon`, `Free`, or `$<price><period>`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.coming_soon {
            f.write_str("Coming Soon")
        } else if self.is_free() {
            f.write_str("Free")
        } else {
            write!(f, "${}{}", self.price, self.period)
        }
    }
}

/// FAQ list where at most one answer is open.
#[derive(Debug)]
pub struct FaqAccordion {
    len: usize,
    open: Option<usize>,
}

impl FaqAccordion {
    /// Accordion over `len` entries with the first one open.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            len,
            open: (len > 0).then_some(0),
        }
    }

    #[must_use]
    pub fn open_index(&self) -> Option<usize> {
        self.open
    }

    #[must_use]
    pub fn is_open(&self, index: usize) -> bool {
        self.open == Some(index)
    }

    /// Clicking the open entry closes it; clicking another opens that one.
    /// Out-of-range indexes are ignored.
    pub fn click(&mut self, index: usize) {
        if index >= self.len {
            return;
        }
        self.open = if self.is_open(index) { None } else { Some(index) };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const PRICING_JSON: &str = r#"{
        "plans": [
            {"id": "starter", "name": "Starter", "description": "For individuals",
             "monthlyPrice": 0, "annualPrice": 0, "features": ["10 queries"],
             "ctaText": "Start Free", "ctaLink": "/register", "popular": false},
            {"id": "pro", "name": "Professional", "description": "For practitioners",
             "monthlyPrice": 29, "annualPrice": 290, "features": ["Unlimited queries", "Citations"],
             "ctaText": "Go Pro", "popular": true},
            {"id": "firm", "name": "Firm", "description": "For teams",
             "monthlyPrice": 99.5, "annualPrice": 995, "features": [],
             "ctaText": "Contact", "popular": false, "comingSoon": true}
        ],
        "faqs": [
            {"question": "Is there a free plan?", "answer": "Yes."},
            {"question": "Can I cancel?", "answer": "Anytime."}
        ]
    }"#;

    fn pricing() -> PricingData {
        serde_json::from_str(PRICING_JSON).unwrap()
    }

    #[test]
    fn test_parse_and_validate() {
        let data = pricing();
        assert_eq!(data.plans.len(), 3);
        assert!(data.plans[1].popular);
        assert!(data.plans[2].coming_soon);
        assert_eq!(data.plans[1].cta_link, None);
        assert!(data.validate().is_ok());
    }

    #[test]
    fn test_quotes() {
        let data = pricing();
        let pro = &data.plans[1];

        assert_eq!(pro.quote(BillingCycle::Monthly).to_string(), "$29/mo");
        assert_eq!(pro.quote(BillingCycle::Annual).to_string(), "$290/yr");
        assert_eq!(data.plans[0].quote(BillingCycle::Annual).to_string(), "Free");
        assert_eq!(
            data.plans[2].quote(BillingCycle::Monthly).to_string(),
            "Coming Soon"
        );
    }

    #[test]
    fn test_fractional_price() {
        let mut firm = pricing().plans.remove(2);
        firm.coming_soon = false;
        assert_eq!(firm.quote(BillingCycle::Monthly).to_string(), "$99.5/mo");
    }

    #[test]
    fn test_billing_cycle_toggle() {
        let cycle = BillingCycle::default();
        assert_eq!(cycle, BillingCycle::Monthly);
        assert_eq!(cycle.toggled(), BillingCycle::Annual);
        assert_eq!(cycle.toggled().toggled(), BillingCycle::Monthly);
    }

    #[test]
    fn test_cta_href() {
        let data = pricing();
        assert_eq!(data.plans[0].cta_href(), "/register");
        assert_eq!(data.plans[1].cta_href(), SIGNUP_URL);
        assert_eq!(data.plans[2].cta_href(), "#");
    }

    #[test]
    fn test_validate_negative_price() {
        let mut data = pricing();
        data.plans[1].annual_price = -1.0;
        let msg = data.validate().unwrap_err().to_string();
        assert!(msg.starts_with("plans 'pro': annualPrice"), "{msg}");
    }

    #[test]
    fn test_validate_duplicate_plan() {
        let mut data = pricing();
        data.plans[2].id = "pro".to_owned();
        assert_eq!(
            data.validate().unwrap_err().to_string(),
            "plans 'pro': id is duplicated"
        );
    }

    #[test]
    fn test_validate_empty_faq_answer() {
        let mut data = pricing();
        data.faqs[1].answer = String::new();
        assert_eq!(
            data.validate().unwrap_err().to_string(),
            "faqs[1]: answer cannot be empty"
        );
    }

    #[test]
    fn test_accordion_starts_with_first_open() {
        let accordion = FaqAccordion::new(3);
        assert_eq!(accordion.open_index(), Some(0));
        assert_eq!(FaqAccordion::new(0).open_index(), None);
    }

    #[test]
    fn test_accordion_click() {
        let mut accordion = FaqAccordion::new(3);

        accordion.click(2);
        assert!(accordion.is_open(2));
        assert!(!accordion.is_open(0));

        accordion.click(2);
        assert_eq!(accordion.open_index(), None);

        accordion.click(1);
        assert_eq!(accordion.open_index(), Some(1));

        accordion.click(7);
        assert_eq!(accordion.open_index(), Some(1));
    }
}
