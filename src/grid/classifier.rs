use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use super::{
    assigner::CellBuckets,
    GridDefinition,
};
use crate::core::{
    utils::NormalizeDigits,
    PopulatedCell,
};

fn month_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^0?([1-9]|1[0-2])\s*月?$").expect("valid month pattern"))
}

fn day_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(0?[0-9]|[12][0-9]|3[01])\s*日?$").expect("valid day pattern"))
}

/// `3月` -> 3. The whole text has to be the token.
pub fn parse_month_token(text: &str) -> Option<u32> {
    let normalized = text.trim().normalize_digits();
    month_pattern().captures(&normalized)?.get(1)?.as_str().parse().ok()
}

/// `07日` -> "7". A literal zero stays "0" since it marks a blank cell.
pub fn parse_day_token(text: &str) -> Option<String> {
    let normalized = text.trim().normalize_digits();
    let digits = day_pattern().captures(&normalized)?.get(1)?.as_str().to_string();
    digits.parse::<u32>().ok().map(|day| day.to_string())
}

/// First month token in the header bucket, if the grid has a header at all.
pub fn infer_month(buckets: &CellBuckets, grid: &GridDefinition) -> Option<u32> {
    let header = grid.header_index()?;
    buckets.get(header).iter().find_map(|text| parse_month_token(text))
}

pub fn classify(buckets: &CellBuckets, grid: &GridDefinition) -> Vec<PopulatedCell> {
    let month = infer_month(buckets, grid);
    if month.is_none() {
        debug!("no month token found in the header cell");
    }

    grid.cells()
        .iter()
        .enumerate()
        .map(|(index, cell)| {
            if grid.is_header(index) {
                return PopulatedCell {
                    day: cell.default_day.clone(),
                    bounds: cell.bounds,
                    month,
                    schedule: String::new(),
                };
            }

            let mut day = cell.default_day.clone();
            let mut day_found = false;
            let mut schedule: Vec<&str> = Vec::new();

            for text in buckets.get(index) {
                match parse_day_token(text) {
                    Some(token) => {
                        if !day_found {
                            day = token;
                            day_found = true;
                        }
                    }
                    None => schedule.push(text.as_str()),
                }
            }

            PopulatedCell { day, bounds: cell.bounds, month, schedule: schedule.join(" ") }
        })
        .collect()
}
