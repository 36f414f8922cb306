//! Credit packages and purchase quotes. Amounts are in paise.

use crate::error::GetProsError;
use crate::validation::{FieldError, ValidationErrors};
use serde::Serialize;

/// GST applied on top of the package price, in percent
pub const GST_PERCENT: u64 = 18;
/// Price of a single credit outside any package
pub const PER_CREDIT_PAISE: u64 = 54_900;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CreditPackage {
    pub name: &'static str,
    pub credits: u32,
    pub price_paise: u64,
}

pub const PACKAGES: [CreditPackage; 3] = [
    CreditPackage {
        name: "Starter",
        credits: 10,
        price_paise: 4_99_900,
    },
    CreditPackage {
        name: "Growth",
        credits: 25,
        price_paise: 11_49_900,
    },
    CreditPackage {
        name: "Enterprise",
        credits: 50,
        price_paise: 21_99_900,
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub credits_requested: u32,
    pub credits_granted: u32,
    /// `None` when charged per credit
    pub package: Option<CreditPackage>,
    pub subtotal_paise: u64,
    pub gst_paise: u64,
    pub total_paise: u64,
}

/// Price `credits`: the smallest package covering the request, or the
/// per-credit rate once the request is larger than every package.
pub fn quote(credits: u32) -> Result<Quote, GetProsError> {
    if credits == 0 {
        return Err(ValidationErrors {
            errors: vec![FieldError {
                field: "credits".to_string(),
                message: "must be greater than zero".to_string(),
            }],
        }
        .into());
    }

    let package = PACKAGES.iter().find(|p| p.credits >= credits).copied();
    let (credits_granted, subtotal_paise) = match package {
        Some(p) => (p.credits, p.price_paise),
        None => (credits, u64::from(credits) * PER_CREDIT_PAISE),
    };

    // rounded to the nearest paisa
    let gst_paise = (subtotal_paise * GST_PERCENT + 50) / 100;

    log::debug!(
        "Quoted {} credits as {:?}: {} + {} GST",
        credits,
        package.map(|p| p.name),
        subtotal_paise,
        gst_paise
    );

    Ok(Quote {
        credits_requested: credits,
        credits_granted,
        package,
        subtotal_paise,
        gst_paise,
        total_paise: subtotal_paise + gst_paise,
    })
}

/// `₹12,345.67` with Indian digit grouping
pub fn format_inr(paise: u64) -> String {
    let rupees = (paise / 100).to_string();
    let fraction = paise % 100;

    let grouped = if rupees.len() <= 3 {
        rupees
    } else {
        let (head, tail) = rupees.split_at(rupees.len() - 3);
        let head_groups: Vec<&str> = {
            let mut groups = Vec::new();
            let mut end = head.len();
            while end > 2 {
                groups.push(&head[end - 2..end]);
                end -= 2;
            }
            groups.push(&head[..end]);
            groups.reverse();
            groups
        };
        format!("{},{}", head_groups.join(","), tail)
    };

    format!("₹{}.{:02}", grouped, fraction)
}
