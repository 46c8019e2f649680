//! Weekday assignment by decomposition complexity.
//!
//! Doses that need many pills go to the weekend; the simplest doses land on
//! weekdays. This keeps irregular pill combinations out of the workweek for
//! patients who fill a fixed weekday pill organizer.

use crate::distribute::half_units_to_mg;
use crate::types::{DayAssignment, Denomination, Weekday, WeeklyRegimen};

/// Weekdays in the order they receive the hardest-to-split doses.
pub const PRIORITY_ORDER: [Weekday; 7] = [
    Weekday::Saturday,
    Weekday::Sunday,
    Weekday::Friday,
    Weekday::Thursday,
    Weekday::Wednesday,
    Weekday::Tuesday,
    Weekday::Monday,
];

/// A feasible daily dose before it is pinned to a weekday.
#[derive(Clone, Debug)]
pub struct DayDose {
    pub half_units: u32,
    pub pills: Vec<Denomination>,
}

impl DayDose {
    pub fn complexity(&self) -> usize {
        self.pills.len()
    }
}

/// Assign seven feasible doses to weekdays and return the regimen in
/// Monday-first order.
///
/// Sort is descending by complexity, ties broken by the larger dose. The
/// tie-break has no clinical meaning but keeps output deterministic.
pub fn assign_week(days: [DayDose; 7]) -> WeeklyRegimen {
    let mut days = days;
    days.sort_by(|a, b| {
        b.complexity()
            .cmp(&a.complexity())
            .then_with(|| b.half_units.cmp(&a.half_units))
    });

    let mut assigned: Vec<DayAssignment> = days
        .into_iter()
        .zip(PRIORITY_ORDER)
        .map(|(day, weekday)| DayAssignment {
            weekday,
            dose_mg: half_units_to_mg(day.half_units),
            pills: day.pills,
        })
        .collect();

    assigned.sort_by_key(|a| a.weekday);
    let days: [DayAssignment; 7] = assigned
        .try_into()
        .expect("seven doses in, seven assignments out");
    WeeklyRegimen { days }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decompose::decompose;
    use crate::types::{PillFamily, PillSelection};

    fn day(half_units: u32, selection: &PillSelection) -> DayDose {
        let pills = decompose(half_units, &selection.denominations())
            .expect("test doses must be feasible");
        DayDose { half_units, pills }
    }

    #[test]
    fn test_most_complex_lands_on_saturday() {
        let selection = PillSelection::only(PillFamily::Base2);
        // 2,2,2 mg (1 pill) and 1.5,1.5,1.5,1.5 mg (2 pills: 1 + 0.5)
        let days = [
            day(4, &selection),
            day(4, &selection),
            day(4, &selection),
            day(3, &selection),
            day(3, &selection),
            day(3, &selection),
            day(3, &selection),
        ];

        let regimen = assign_week(days);

        // Four 2-pill days fill Sat, Sun, Fri, Thu; 1-pill days the rest
        for weekday in [
            Weekday::Saturday,
            Weekday::Sunday,
            Weekday::Friday,
            Weekday::Thursday,
        ] {
            assert_eq!(regimen.day(weekday).dose_mg, 1.5);
            assert_eq!(regimen.day(weekday).complexity(), 2);
        }
        for weekday in [Weekday::Wednesday, Weekday::Tuesday, Weekday::Monday] {
            assert_eq!(regimen.day(weekday).dose_mg, 2.0);
            assert_eq!(regimen.day(weekday).complexity(), 1);
        }
    }

    #[test]
    fn test_tie_break_prefers_larger_dose() {
        let selection = PillSelection::all();
        // 5.0 mg and 3.0 mg are both single-pill days; the larger dose
        // must sort first and take Saturday.
        let mut days = Vec::new();
        days.push(day(10, &selection)); // 5.0 mg, 1 pill
        for _ in 0..6 {
            days.push(day(6, &selection)); // 3.0 mg, 1 pill
        }
        let days: [DayDose; 7] = days.try_into().unwrap();

        let regimen = assign_week(days);
        assert_eq!(regimen.day(Weekday::Saturday).dose_mg, 5.0);
    }

    #[test]
    fn test_output_is_monday_first() {
        let selection = PillSelection::all();
        let days = std::array::from_fn(|_| day(6, &selection));
        let regimen = assign_week(days);

        let weekdays: Vec<Weekday> = regimen.days.iter().map(|d| d.weekday).collect();
        assert_eq!(weekdays, Weekday::WEEK.to_vec());
    }

    #[test]
    fn test_deterministic() {
        let selection = PillSelection::all();
        let make = || -> [DayDose; 7] { std::array::from_fn(|i| day(3 + i as u32, &selection)) };
        assert_eq!(assign_week(make()), assign_week(make()));
    }
}
