//! Overview metrics and chart series computed from the full record set.
//!
//! Every function here is total over its input: an empty slice yields zero
//! counts and default values, never an error or a NaN.

use crate::types::{
    ChartData, ChartKind, ChartSeries, Icon, OverviewMetric, SeriesPoint, VehicleRecord, BEV_TYPE,
};
use crate::util::{coerce_f64, coerce_i32, format_int, format_number};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Number of entries kept by the top-N charts.
pub const TOP_N: usize = 5;

/// City bucket for records without a city.
pub const UNKNOWN_CITY: &str = "Unknown";

#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    pub total: usize,
    pub average_range: f64,
    /// Share of records whose type is exactly [`BEV_TYPE`], in `[0, 100]`.
    pub bev_percentage: f64,
    pub top_make: Option<String>,
}

impl Overview {
    /// Cards in display order: total, average range, BEV share, top make.
    pub fn metrics(&self) -> Vec<OverviewMetric> {
        let bev = if self.total > 0 {
            format!("{:.2}%", self.bev_percentage)
        } else {
            "0%".to_string()
        };
        vec![
            OverviewMetric {
                title: "Total EVs",
                value: format_int(self.total),
                icon: Icon::Car,
            },
            OverviewMetric {
                title: "Avg Range",
                value: format!("{} mi", format_number(self.average_range, 1)),
                icon: Icon::Battery,
            },
            OverviewMetric {
                title: "% BEV",
                value: bev,
                icon: Icon::Bolt,
            },
            OverviewMetric {
                title: "Top Make",
                value: self.top_make.clone().unwrap_or_else(|| "N/A".to_string()),
                icon: Icon::Industry,
            },
        ]
    }
}

/// Count occurrences of each key, remembering the order keys first appear.
fn count_in_order<'a, I>(keys: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = Cow<'a, str>>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();
    for key in keys {
        match index.get(&*key) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(key.to_string(), counts.len());
                counts.push((key.into_owned(), 1));
            }
        }
    }
    counts
}

/// Sort by descending count. Ties keep first-encountered order.
fn rank_desc(mut counts: Vec<(String, usize)>) -> Vec<(String, usize)> {
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

fn top_n(counts: Vec<(String, usize)>) -> Vec<SeriesPoint> {
    rank_desc(counts)
        .into_iter()
        .take(TOP_N)
        .map(|(category, count)| SeriesPoint::new(category, count))
        .collect()
}

fn city_key(city: &str) -> Cow<'_, str> {
    let key = city.trim().to_uppercase();
    if key.is_empty() {
        Cow::Borrowed(UNKNOWN_CITY)
    } else {
        Cow::Owned(key)
    }
}

pub fn overview(data: &[VehicleRecord]) -> Overview {
    let total = data.len();
    let range_sum: f64 = data.iter().map(|r| coerce_f64(&r.electric_range)).sum();
    let bev_count = data.iter().filter(|r| r.vehicle_type == BEV_TYPE).count();

    let (average_range, bev_percentage) = if total == 0 {
        (0.0, 0.0)
    } else {
        (
            range_sum / total as f64,
            bev_count as f64 / total as f64 * 100.0,
        )
    };

    let top_make = rank_desc(count_in_order(
        data.iter().map(|r| Cow::Borrowed(r.make.as_str())),
    ))
    .into_iter()
    .next()
    .map(|(make, _)| make);

    debug!(total, bev_count, "computed overview");
    Overview {
        total,
        average_range,
        bev_percentage,
        top_make,
    }
}

/// Registrations per model year, ascending. Malformed years count as year 0.
pub fn counts_by_year(data: &[VehicleRecord]) -> Vec<(i32, usize)> {
    let mut years: BTreeMap<i32, usize> = BTreeMap::new();
    for r in data {
        *years.entry(coerce_i32(&r.model_year)).or_insert(0) += 1;
    }
    years.into_iter().collect()
}

/// `(bev, phev)` counts by case-insensitive substring match on the type.
pub fn powertrain_split(data: &[VehicleRecord]) -> (usize, usize) {
    let (mut bev, mut phev) = (0usize, 0usize);
    for r in data {
        let kind = r.vehicle_type.to_lowercase();
        if kind.contains("bev") {
            bev += 1;
        } else if kind.contains("phev") {
            phev += 1;
        }
    }
    (bev, phev)
}

pub fn top_makers(data: &[VehicleRecord]) -> Vec<SeriesPoint> {
    top_n(count_in_order(
        data.iter().map(|r| Cow::Borrowed(r.make.as_str())),
    ))
}

/// Top cities by upper-cased, trimmed name. Blank cities share one bucket.
pub fn top_cities(data: &[VehicleRecord]) -> Vec<SeriesPoint> {
    top_n(count_in_order(data.iter().map(|r| city_key(&r.city))))
}

pub fn chart_data(data: &[VehicleRecord]) -> ChartData {
    let (bev, phev) = powertrain_split(data);
    let by_year = counts_by_year(data)
        .into_iter()
        .map(|(year, count)| SeriesPoint::new(year.to_string(), count))
        .collect();

    ChartData {
        by_year: ChartSeries {
            kind: ChartKind::GrowthByYear,
            points: by_year,
        },
        bev_vs_phev: ChartSeries {
            kind: ChartKind::BevVsPhev,
            points: vec![SeriesPoint::new("BEV", bev), SeriesPoint::new("PHEV", phev)],
        },
        top_makers: ChartSeries {
            kind: ChartKind::TopMakers,
            points: top_makers(data),
        },
        top_cities: ChartSeries {
            kind: ChartKind::TopCities,
            points: top_cities(data),
        },
    }
}
