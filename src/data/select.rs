use super::model::{DurationRecord, DurationSeries, ResourceRecord, ResourceSeries};

/// Benchmark phase whose calls are measured. Other terms are warm-up or control.
pub const MEASURED_TERM: i64 = 40;

const MICROS_PER_MILLI: f64 = 1000.0;

// ---------------------------------------------------------------------------
// Duration selector
// ---------------------------------------------------------------------------

/// Keep measured-phase calls, order them by job number and convert to ms.
///
/// The sort is stable, so rows sharing a job number keep their file order.
pub fn select_durations(records: &[DurationRecord]) -> DurationSeries {
    let mut measured: Vec<&DurationRecord> = records
        .iter()
        .filter(|r| r.term == MEASURED_TERM)
        .collect();

    let excluded = records.len() - measured.len();
    if excluded > 0 {
        log::debug!("excluded {excluded} rows outside term {MEASURED_TERM}");
    }

    measured.sort_by_key(|r| r.job_number);

    DurationSeries {
        job_numbers: measured.iter().map(|r| r.job_number).collect(),
        durations_ms: measured
            .iter()
            .map(|r| r.duration_us / MICROS_PER_MILLI)
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Resource selector
// ---------------------------------------------------------------------------

/// Split samples into parallel memory and CPU series ordered by timestamp.
///
/// The log is written chronologically, so this is normally file order; the
/// stable sort only matters for a log whose clock stepped backwards.
pub fn select_resources(records: &[ResourceRecord]) -> ResourceSeries {
    let mut ordered: Vec<&ResourceRecord> = records.iter().collect();
    ordered.sort_by_key(|r| r.datetime);

    let mut series = ResourceSeries {
        timestamps: Vec::with_capacity(ordered.len()),
        mem: Vec::with_capacity(ordered.len()),
        cpu: Vec::with_capacity(ordered.len()),
    };
    for r in ordered {
        series.timestamps.push(r.datetime);
        series.mem.push(r.mem);
        series.cpu.push(r.cpu);
    }
    series
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::*;

    fn call(job_number: i64, term: i64, duration_us: f64) -> DurationRecord {
        DurationRecord {
            job_number,
            term,
            duration_us,
        }
    }

    fn at(secs: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 5, 1)
            .unwrap()
            .and_hms_opt(12, 0, secs)
            .unwrap()
    }

    #[test]
    fn keeps_only_measured_term_in_job_order() {
        let records = vec![
            call(3, 40, 7000.0),
            call(2, 10, 9000.0),
            call(1, 40, 5000.0),
        ];

        let series = select_durations(&records);

        assert_eq!(series.job_numbers, vec![1, 3]);
        assert_eq!(series.durations_ms, vec![5.0, 7.0]);
    }

    #[test]
    fn series_length_matches_measured_rows_and_is_ordered() {
        let records: Vec<DurationRecord> = (0..50)
            .rev()
            .map(|i| call(i, if i % 3 == 0 { 10 } else { 40 }, i as f64 * 100.0))
            .collect();
        let expected = records.iter().filter(|r| r.term == 40).count();

        let series = select_durations(&records);

        assert_eq!(series.len(), expected);
        assert!(series.job_numbers.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn no_measured_rows_gives_empty_series() {
        let series = select_durations(&[call(1, 10, 1.0), call(2, 41, 2.0)]);

        assert!(series.is_empty());
    }

    #[test]
    fn resource_samples_are_chronological_with_stable_ties() {
        let records = vec![
            ResourceRecord { datetime: at(2), mem: 3.0, cpu: 30.0 },
            ResourceRecord { datetime: at(1), mem: 1.0, cpu: 10.0 },
            ResourceRecord { datetime: at(2), mem: 4.0, cpu: 40.0 },
        ];

        let series = select_resources(&records);

        assert_eq!(series.timestamps, vec![at(1), at(2), at(2)]);
        assert_eq!(series.mem, vec![1.0, 3.0, 4.0]);
        assert_eq!(series.cpu, vec![10.0, 30.0, 40.0]);
    }
}
