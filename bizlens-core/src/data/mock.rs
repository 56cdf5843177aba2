use super::types::{Customer, NumericTable, ProductionRecord};
use super::{DataError, DataSource, Result};
use crate::recommend::RatingsMatrix;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use tracing::debug;

/// Column names of the generated sales table.
pub const SALES_COLUMNS: [&str; 7] = [
    "Price",
    "Stock",
    "Expected Demand",
    "Ad Spend",
    "Store Visitors",
    "Buyers",
    "Weekday",
];

pub const MINERALS: [&str; 4] = ["Gold", "Silver", "Copper", "Iron"];

const USERS: usize = 5;
const ITEMS: [&str; 5] = ["Movie A", "Movie B", "Movie C", "Movie D", "Movie E"];
/// Probability that a generated rating is left unrated.
const UNRATED_PROBABILITY: f64 = 0.3;
const MONTHS: u32 = 12;
const FIRST_YEAR: i32 = 2023;

/// Seeded synthetic data.
///
/// Ratings leave roughly a third of the cells unrated so the recommender has
/// candidates to rank.
///
/// Every call starts from a fresh generator seeded with `seed`, so the same
/// source always yields the same dataset for the same arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockDataSource {
    seed: u64,
}

impl Default for MockDataSource {
    fn default() -> Self {
        Self::new(42)
    }
}

impl MockDataSource {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed)
    }
}

impl DataSource for MockDataSource {
    fn ratings(&self) -> Result<RatingsMatrix> {
        let mut rng = self.rng();
        let users: Vec<String> = (1..=USERS).map(|u| format!("User {}", u)).collect();

        let rows = (0..USERS)
            .map(|_| {
                let base: Vec<u32> = (0..ITEMS.len()).map(|_| rng.gen_range(1..10)).collect();
                base.into_iter()
                    .map(|b| {
                        let rating = f64::from(b) + rng.gen_range(0.0..2.0);
                        (!rng.gen_bool(UNRATED_PROBABILITY)).then_some(rating)
                    })
                    .collect()
            })
            .collect();

        let ratings = RatingsMatrix::from_rows(users, ITEMS, rows)?;
        debug!(seed = self.seed, users = USERS, items = ITEMS.len(), "Generated ratings");
        Ok(ratings)
    }

    fn sales(&self, rows: usize) -> Result<NumericTable> {
        if rows < 2 {
            return Err(DataError::NotEnoughRows {
                required: 2,
                found: rows,
            });
        }

        let mut rng = self.rng();
        let noise =
            Normal::new(0.0, 20.0).map_err(|e| DataError::Distribution(e.to_string()))?;

        let price: Vec<f64> = (0..rows).map(|_| rng.gen_range(5.0..50.0)).collect();
        let stock: Vec<f64> = (0..rows)
            .map(|_| f64::from(rng.gen_range(10u32..500)))
            .collect();
        let demand_base: Vec<f64> = (0..rows)
            .map(|_| f64::from(rng.gen_range(5u32..300)))
            .collect();
        let demand: Vec<f64> = demand_base
            .into_iter()
            .map(|d| d + noise.sample(&mut rng))
            .collect();
        let ad_spend: Vec<f64> = (0..rows).map(|_| rng.gen_range(100.0..5000.0)).collect();
        let visitors: Vec<f64> = (0..rows)
            .map(|_| f64::from(rng.gen_range(50u32..2000)))
            .collect();
        let buyers: Vec<f64> = visitors
            .iter()
            .map(|v| v * rng.gen_range(0.05..0.5))
            .collect();
        let weekday: Vec<f64> = (0..rows)
            .map(|_| f64::from(rng.gen_range(1u32..=7)))
            .collect();

        let columns = SALES_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .zip([price, stock, demand, ad_spend, visitors, buyers, weekday])
            .collect();

        let table = NumericTable::from_columns(columns)?;
        debug!(seed = self.seed, rows, "Generated sales table");
        Ok(table)
    }

    fn customers(&self, count: usize) -> Result<Vec<Customer>> {
        let mut rng = self.rng();

        let ages: Vec<u32> = (0..count).map(|_| rng.gen_range(18..70)).collect();
        let incomes: Vec<u32> = (0..count).map(|_| rng.gen_range(15_000..120_000)).collect();
        let spends: Vec<u32> = (0..count).map(|_| rng.gen_range(500..5_000)).collect();
        let frequencies: Vec<u32> = (0..count).map(|_| rng.gen_range(1..30)).collect();

        let customers = (0..count)
            .map(|i| Customer {
                id: i as u32 + 1,
                age: ages[i],
                income: incomes[i],
                avg_spend: spends[i],
                purchase_frequency: frequencies[i],
            })
            .collect();

        debug!(seed = self.seed, count, "Generated customers");
        Ok(customers)
    }

    fn production(&self) -> Result<Vec<ProductionRecord>> {
        let mut rng = self.rng();
        let dates = month_ends(FIRST_YEAR, MONTHS)?;
        let total = dates.len() * MINERALS.len();

        let tonnes: Vec<u64> = (0..total).map(|_| rng.gen_range(500..5_000)).collect();
        let costs: Vec<u64> = (0..total)
            .map(|_| rng.gen_range(100_000..1_000_000))
            .collect();
        let profits: Vec<u64> = (0..total)
            .map(|_| rng.gen_range(50_000..900_000))
            .collect();

        let records = MINERALS
            .iter()
            .flat_map(|mineral| dates.iter().map(move |date| (*mineral, *date)))
            .enumerate()
            .map(|(i, (mineral, date))| ProductionRecord {
                date,
                mineral: mineral.to_string(),
                tonnes: tonnes[i],
                cost: costs[i],
                profit: profits[i],
            })
            .collect();

        debug!(seed = self.seed, records = total, "Generated production records");
        Ok(records)
    }
}

/// Last day of each of `months` consecutive months starting in January of `year`.
fn month_ends(year: i32, months: u32) -> Result<Vec<NaiveDate>> {
    (1..=months)
        .map(|m| {
            let (next_year, next_month) = if m == 12 { (year + 1, 1) } else { (year, m + 1) };
            NaiveDate::from_ymd_opt(next_year, next_month, 1)
                .and_then(|first| first.pred_opt())
                .ok_or_else(|| DataError::InvalidDate(format!("{}-{:02}", year, m)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratings_shape_and_range() {
        let ratings = MockDataSource::default().ratings().unwrap();
        assert_eq!(ratings.users().len(), 5);
        assert_eq!(ratings.items(), &ITEMS.map(String::from));
        assert!(ratings.rated_count() <= 25);

        for user in ratings.users() {
            for item in ratings.items() {
                if let Some(r) = ratings.get(user, item) {
                    assert!((1.0..11.0).contains(&r));
                }
            }
        }
    }

    #[test]
    fn test_same_seed_same_data() {
        let a = MockDataSource::new(7);
        let b = MockDataSource::new(7);
        assert_eq!(a.ratings().unwrap(), b.ratings().unwrap());
        assert_eq!(a.customers(20).unwrap(), b.customers(20).unwrap());
    }

    #[test]
    fn test_different_seed_different_data() {
        assert_ne!(
            MockDataSource::new(1).ratings().unwrap(),
            MockDataSource::new(2).ratings().unwrap()
        );
    }

    #[test]
    fn test_sales_table() {
        let table = MockDataSource::default().sales(50).unwrap();
        assert_eq!(table.len(), 50);
        assert_eq!(table.columns().len(), SALES_COLUMNS.len());

        let weekday = table.column(6);
        assert!(weekday.iter().all(|d| (1.0..=7.0).contains(d)));

        let visitors = table.column(4);
        let buyers = table.column(5);
        for (v, b) in visitors.iter().zip(&buyers) {
            assert!(*b <= v * 0.5 && *b >= v * 0.05);
        }
    }

    #[test]
    fn test_sales_needs_two_rows() {
        assert!(matches!(
            MockDataSource::default().sales(1),
            Err(DataError::NotEnoughRows { required: 2, found: 1 })
        ));
    }

    #[test]
    fn test_customers() {
        let customers = MockDataSource::default().customers(200).unwrap();
        assert_eq!(customers.len(), 200);
        assert_eq!(customers[0].id, 1);
        assert_eq!(customers[199].id, 200);
        assert!(customers.iter().all(|c| (18..70).contains(&c.age)));
    }

    #[test]
    fn test_production_layout() {
        let records = MockDataSource::default().production().unwrap();
        assert_eq!(records.len(), 48);
        assert_eq!(records[0].mineral, "Gold");
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2023, 1, 31).unwrap());
        assert_eq!(records[1].date, NaiveDate::from_ymd_opt(2023, 2, 28).unwrap());
        assert_eq!(records[11].date, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert_eq!(records[12].mineral, "Silver");
    }
}
