use chrono::{Days, NaiveDate};
use rand::Rng;

use super::error::{DataError, Result};
use super::model::TrendRecord;

/// Topics used when the caller does not name any.
pub const DEMO_TOPICS: [&str; 5] = ["Amlo te amo", "El avión", "covid", "vacuna", "pemex"];

/// Fabricate `week_count` weeks of random topic weights.
///
/// Each week draws one uniform `[0, 1)` value per topic and divides by the
/// week's total, so every week sums to 1.0.  Week `i` (1-based) is dated
/// `start + 7 * (i - 1)` days.  Output is week-major, topics in input order.
///
/// Fails with [`DataError::WeekRange`] when the last week would fall past
/// `NaiveDate::MAX`; either every requested week is generated or none is.
///
/// Pass a seeded RNG (`StdRng::seed_from_u64`) for reproducible data.
pub fn generate<R, S>(
    topics: &[S],
    week_count: usize,
    start: NaiveDate,
    rng: &mut R,
) -> Result<Vec<TrendRecord>>
where
    R: Rng + ?Sized,
    S: AsRef<str>,
{
    if topics.is_empty() || week_count == 0 {
        return Ok(Vec::new());
    }
    if last_week(start, week_count).is_none() {
        return Err(DataError::WeekRange {
            start,
            weeks: week_count,
        });
    }

    let mut records = Vec::with_capacity(topics.len().saturating_mul(week_count));
    for (week, date) in week_dates(start).take(week_count).enumerate() {
        let draws: Vec<f64> = topics.iter().map(|_| rng.gen::<f64>()).collect();
        let total: f64 = draws.iter().sum();

        for (topic, draw) in topics.iter().zip(draws) {
            // An all-zero draw has no proportions; fall back to a flat week.
            let distribution = if total > 0.0 {
                draw / total
            } else {
                1.0 / topics.len() as f64
            };
            records.push(TrendRecord::new(topic.as_ref(), date, distribution));
        }
        log::trace!("week {} ({date}) generated", week + 1);
    }
    Ok(records)
}

/// Unseeded convenience wrapper: every call produces different data.
pub fn generate_random<S: AsRef<str>>(
    topics: &[S],
    week_count: usize,
    start: NaiveDate,
) -> Result<Vec<TrendRecord>> {
    generate(topics, week_count, start, &mut rand::thread_rng())
}

/// Date of week `week_count` (1-based), if it is representable.
fn last_week(start: NaiveDate, week_count: usize) -> Option<NaiveDate> {
    let offset = u64::try_from(week_count.checked_sub(1)?).ok()?;
    start.checked_add_days(Days::new(offset.checked_mul(7)?))
}

fn week_dates(start: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    std::iter::successors(Some(start), |d| d.checked_add_days(Days::new(7)))
}
