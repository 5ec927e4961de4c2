//! Static GDPR enforcement reference data

use chrono::NaiveDate;
use serde::Serialize;

/// A published GDPR fine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GdprFine {
    pub id: u32,
    pub company: &'static str,
    pub country: &'static str,
    /// ISO date (`YYYY-MM-DD`)
    pub date: &'static str,
    pub amount_eur: u64,
    pub violation: &'static str,
    pub authority: &'static str,
}

impl GdprFine {
    /// Parsed decision date
    #[must_use]
    pub fn decided_on(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date, "%Y-%m-%d").ok()
    }
}

/// Aggregate fines for one year (amount in € millions)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearlyFines {
    pub year: u16,
    pub amount_millions: u32,
    pub count: u32,
}

/// The largest published fines
pub const GDPR_FINES: [GdprFine; 8] = [
    GdprFine { id: 1, company: "Meta Platforms Ireland", country: "Ireland", date: "2023-05-22", amount_eur: 1_200_000_000, violation: "Data transfer violations, lack of legal basis", authority: "Irish DPC" },
    GdprFine { id: 2, company: "Amazon Europe Core", country: "Luxembourg", date: "2021-07-30", amount_eur: 746_000_000, violation: "Processing personal data without proper legal basis", authority: "Luxembourg CNPD" },
    GdprFine { id: 3, company: "WhatsApp Ireland", country: "Ireland", date: "2021-09-02", amount_eur: 225_000_000, violation: "Transparency violations, lack of clear information", authority: "Irish DPC" },
    GdprFine { id: 4, company: "Google Ireland", country: "Ireland", date: "2023-01-04", amount_eur: 90_000_000, violation: "Lack of transparency, insufficient legal basis", authority: "Irish DPC" },
    GdprFine { id: 5, company: "Instagram (Meta)", country: "Ireland", date: "2022-09-05", amount_eur: 405_000_000, violation: "Children's data processing violations", authority: "Irish DPC" },
    GdprFine { id: 6, company: "TikTok", country: "Ireland", date: "2023-09-15", amount_eur: 345_000_000, violation: "Children's privacy, data transfers to China", authority: "Irish DPC" },
    GdprFine { id: 7, company: "British Airways", country: "UK", date: "2020-10-16", amount_eur: 22_500_000, violation: "Data breach affecting 400,000+ customers", authority: "UK ICO" },
    GdprFine { id: 8, company: "H&M", country: "Germany", date: "2020-10-01", amount_eur: 35_300_000, violation: "Excessive employee monitoring", authority: "Hamburg DPA" },
];

/// Total fines per year across all authorities
pub const FINES_BY_YEAR: [YearlyFines; 4] = [
    YearlyFines { year: 2020, amount_millions: 171, count: 124 },
    YearlyFines { year: 2021, amount_millions: 1089, count: 158 },
    YearlyFines { year: 2022, amount_millions: 672, count: 189 },
    YearlyFines { year: 2023, amount_millions: 2156, count: 201 },
];

/// Headline figures over a set of fines
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FineSummary {
    pub total_eur: u64,
    pub average_eur: f64,
    pub largest: Option<GdprFine>,
}

/// Summarise fines
#[must_use]
pub fn summarize(fines: &[GdprFine]) -> FineSummary {
    let total_eur: u64 = fines.iter().map(|f| f.amount_eur).sum();
    #[allow(clippy::cast_precision_loss)]
    let average_eur = if fines.is_empty() {
        0.0
    } else {
        total_eur as f64 / fines.len() as f64
    };
    FineSummary {
        total_eur,
        average_eur,
        largest: fines.iter().max_by_key(|f| f.amount_eur).copied(),
    }
}

/// Fines ordered largest first
#[must_use]
pub fn by_amount_desc(fines: &[GdprFine]) -> Vec<GdprFine> {
    let mut sorted = fines.to_vec();
    sorted.sort_by(|a, b| b.amount_eur.cmp(&a.amount_eur));
    sorted
}

/// `€1.20B`, `€746M`, or `€12,345`
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_eur(amount: f64) -> String {
    if amount >= 1_000_000_000.0 {
        format!("€{:.2}B", amount / 1_000_000_000.0)
    } else if amount >= 1_000_000.0 {
        format!("€{:.0}M", amount / 1_000_000.0)
    } else {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let whole = amount.max(0.0).round() as u64;
        format!("€{}", group_thousands(whole))
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
