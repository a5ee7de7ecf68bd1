//! Headline numbers shown on the admin dashboard.

use std::collections::HashSet;

use serde::Serialize;

use crate::car::CarRecord;
use crate::category::CategoryRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_cars: usize,
    /// Number of distinct brand names across all cars.
    pub total_brands: usize,
    pub total_categories: usize,
    /// Mean price rounded to the nearest whole unit, `0` with no cars.
    pub average_price: u64,
}

impl DashboardStats {
    pub fn compute(cars: &[CarRecord], categories: &[CategoryRecord]) -> Self {
        let total_brands = cars
            .iter()
            .map(|car| car.brand_name.as_str())
            .collect::<HashSet<_>>()
            .len();

        let average_price = if cars.is_empty() {
            0
        } else {
            let sum: f64 = cars.iter().map(|car| car.price).sum();
            (sum / cars.len() as f64).round().max(0.0) as u64
        };

        Self {
            total_cars: cars.len(),
            total_brands,
            total_categories: categories.len(),
            average_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::car::tests::sample_car;

    #[test]
    fn empty_inventory_has_zero_stats() {
        let stats = DashboardStats::compute(&[], &[]);
        assert_eq!(
            stats,
            DashboardStats {
                total_cars: 0,
                total_brands: 0,
                total_categories: 0,
                average_price: 0,
            }
        );
    }

    #[test]
    fn stats_count_distinct_brands_and_round_average() {
        let cars = vec![
            sample_car(1, "Civic", "Honda", "sedan", 10.0),
            sample_car(2, "Accord", "Honda", "sedan", 11.0),
            sample_car(3, "RX7", "Mazda", "sports", 12.0),
            sample_car(4, "CX-5", "Mazda", "suv", 12.0),
        ];
        let categories = vec![
            CategoryRecord::new("sedan").unwrap(),
            CategoryRecord::new("sports").unwrap(),
            CategoryRecord::new("suv").unwrap(),
        ];

        let stats = DashboardStats::compute(&cars, &categories);

        assert_eq!(stats.total_cars, 4);
        assert_eq!(stats.total_brands, 2);
        assert_eq!(stats.total_categories, 3);
        // 45 / 4 = 11.25
        assert_eq!(stats.average_price, 11);
    }
}
