//! Filtering and search over the interview collection.
//!
//! [`filter`] is pure: it intersects a status predicate, a calendar-day
//! predicate and a single-field search, and keeps the input order.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use super::interview::Interview;
use super::status::Status;
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Only(Status),
}

impl FromStr for StatusFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse::<Status>()
            .map(StatusFilter::Only)
            .map_err(|e| ValidationError::single("status_filter", e.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFilter {
    #[default]
    All,
    Today,
    Upcoming,
    Past,
}

impl FromStr for DateFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(DateFilter::All),
            "today" => Ok(DateFilter::Today),
            "upcoming" => Ok(DateFilter::Upcoming),
            "past" => Ok(DateFilter::Past),
            other => Err(ValidationError::single(
                "date_filter",
                format!("expected all, today, upcoming or past, got {other:?}"),
            )),
        }
    }
}

/// The one field a search query is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    #[default]
    Candidate,
    Interviewer,
    Position,
    Status,
}

impl FromStr for SearchField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "candidate" => Ok(SearchField::Candidate),
            "interviewer" => Ok(SearchField::Interviewer),
            "position" | "role" => Ok(SearchField::Position),
            "status" => Ok(SearchField::Status),
            other => Err(ValidationError::single(
                "search_field",
                format!("expected candidate, interviewer, position or status, got {other:?}"),
            )),
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchField::Candidate => write!(f, "candidate"),
            SearchField::Interviewer => write!(f, "interviewer"),
            SearchField::Position => write!(f, "position"),
            SearchField::Status => write!(f, "status"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterSpec {
    pub status: StatusFilter,
    pub date: DateFilter,
    pub search_field: SearchField,
    pub query: String,
}

impl FilterSpec {
    /// Build a spec from the loose strings a UI or command line supplies.
    ///
    /// Every malformed part is reported, not just the first.
    pub fn parse(
        status: &str,
        date: &str,
        search_field: &str,
        query: &str,
    ) -> Result<Self, ValidationError> {
        let mut errors = ValidationError::new();
        let status = status
            .parse::<StatusFilter>()
            .map_err(|e| errors.extend(e))
            .ok();
        let date = date.parse::<DateFilter>().map_err(|e| errors.extend(e)).ok();
        let search_field = search_field
            .parse::<SearchField>()
            .map_err(|e| errors.extend(e))
            .ok();

        match (status, date, search_field) {
            (Some(status), Some(date), Some(search_field)) => Ok(Self {
                status,
                date,
                search_field,
                query: query.to_string(),
            }),
            _ => Err(errors),
        }
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    fn matches<Tz: TimeZone>(&self, interview: &Interview, now: &DateTime<Tz>, needle: &str) -> bool {
        self.matches_status(interview)
            && self.matches_date(interview, now)
            && self.matches_search(interview, needle)
    }

    fn matches_status(&self, interview: &Interview) -> bool {
        match self.status {
            StatusFilter::All => true,
            StatusFilter::Only(status) => interview.status() == status,
        }
    }

    /// Both days are taken in the timezone of `now`.
    fn matches_date<Tz: TimeZone>(&self, interview: &Interview, now: &DateTime<Tz>) -> bool {
        let today = now.date_naive();
        let day = interview
            .scheduled_at()
            .with_timezone(&now.timezone())
            .date_naive();
        match self.date {
            DateFilter::All => true,
            DateFilter::Today => day == today,
            DateFilter::Upcoming => day >= today,
            DateFilter::Past => day < today,
        }
    }

    fn matches_search(&self, interview: &Interview, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        let haystack = match self.search_field {
            SearchField::Candidate => interview.candidate_name(),
            SearchField::Interviewer => interview.interviewer_name().unwrap_or_default(),
            SearchField::Position => interview.role(),
            SearchField::Status => interview.status().label(),
        };
        haystack.to_lowercase().contains(needle)
    }
}

/// The interviews matching `spec` as of `now`, in input order.
///
/// Calendar days are compared in `now`'s timezone.
pub fn filter<'a, I, Tz>(interviews: I, spec: &FilterSpec, now: &DateTime<Tz>) -> Vec<&'a Interview>
where
    I: IntoIterator<Item = &'a Interview>,
    Tz: TimeZone,
{
    let needle = spec.query.to_lowercase();
    interviews
        .into_iter()
        .filter(|interview| spec.matches(interview, now, &needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone, Utc};

    use super::*;
    use crate::workflow::interview::tests::sample_interview;

    fn today() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
    }

    fn at(iv: Interview, y: i32, m: u32, d: u32, h: u32) -> Interview {
        Interview {
            scheduled_at: Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap(),
            ..iv
        }
    }

    fn cache() -> Vec<Interview> {
        vec![
            at(sample_interview("1", "Anita Rao", Status::Scheduled), 2026, 11, 2, 9),
            at(sample_interview("2", "Anand Joshi", Status::Completed), 2026, 11, 3, 9),
            at(sample_interview("3", "Meera Pillai", Status::Scheduled), 2026, 10, 16, 23),
            at(sample_interview("4", "Rahul Nair", Status::Cancelled), 2026, 9, 1, 9),
        ]
    }

    fn names(result: &[&Interview]) -> Vec<String> {
        result.iter().map(|i| i.candidate_name().to_string()).collect()
    }

    #[test]
    fn default_spec_returns_everything_in_order() {
        let cache = cache();
        let result = filter(&cache, &FilterSpec::default(), &today());
        assert_eq!(
            names(&result),
            vec!["Anita Rao", "Anand Joshi", "Meera Pillai", "Rahul Nair"]
        );
    }

    #[test]
    fn scheduled_upcoming_candidate_search() {
        let cache = cache();
        let spec = FilterSpec::parse("scheduled", "upcoming", "candidate", "an").unwrap();
        let result = filter(&cache, &spec, &today());
        assert_eq!(names(&result), vec!["Anita Rao"]);
    }

    #[test]
    fn today_matches_regardless_of_time_of_day() {
        let mut cache = cache();
        cache.push(at(
            sample_interview("5", "Early Bird", Status::Scheduled),
            2026,
            10,
            16,
            0,
        ));
        let spec = FilterSpec {
            date: DateFilter::Today,
            ..Default::default()
        };
        let result = filter(&cache, &spec, &today());
        assert_eq!(names(&result), vec!["Meera Pillai", "Early Bird"]);
    }

    #[test]
    fn upcoming_includes_today_and_past_excludes_it() {
        let cache = cache();
        let upcoming = FilterSpec {
            date: DateFilter::Upcoming,
            ..Default::default()
        };
        assert_eq!(filter(&cache, &upcoming, &today()).len(), 3);

        let past = FilterSpec {
            date: DateFilter::Past,
            ..Default::default()
        };
        assert_eq!(names(&filter(&cache, &past, &today())), vec!["Rahul Nair"]);
    }

    #[test]
    fn search_only_considers_selected_field() {
        let cache = cache();
        // "Backend" is every role, never a candidate name.
        let by_candidate = FilterSpec::parse("all", "all", "candidate", "backend").unwrap();
        assert!(filter(&cache, &by_candidate, &today()).is_empty());

        let by_position = FilterSpec::parse("all", "all", "position", "BACKEND").unwrap();
        assert_eq!(filter(&cache, &by_position, &today()).len(), 4);

        let by_interviewer = FilterSpec::parse("all", "all", "interviewer", "vikram").unwrap();
        assert_eq!(filter(&cache, &by_interviewer, &today()).len(), 4);
    }

    #[test]
    fn status_search_matches_label() {
        let cache = cache();
        let spec = FilterSpec::parse("all", "all", "status", "cancel").unwrap();
        assert_eq!(names(&filter(&cache, &spec, &today())), vec!["Rahul Nair"]);
    }

    #[test]
    fn whitespace_query_is_matched_literally() {
        let cache = vec![
            sample_interview("1", "Solo", Status::Scheduled),
            sample_interview("2", "Anita Rao", Status::Scheduled),
        ];
        let spec = FilterSpec::parse("all", "all", "candidate", " ").unwrap();
        assert_eq!(names(&filter(&cache, &spec, &today())), vec!["Anita Rao"]);

        let padded = FilterSpec::parse("all", "all", "candidate", " rao").unwrap();
        assert_eq!(names(&filter(&cache, &padded, &today())), vec!["Anita Rao"]);
        let padded = FilterSpec::parse("all", "all", "candidate", "solo ").unwrap();
        assert!(filter(&cache, &padded, &today()).is_empty());
    }

    #[test]
    fn calendar_day_follows_the_clock_timezone() {
        // 21:00 UTC on the 15th is 02:30 on the 16th in India.
        let cache = vec![at(
            sample_interview("1", "Late Call", Status::Scheduled),
            2026,
            10,
            15,
            21,
        )];
        let spec = FilterSpec {
            date: DateFilter::Today,
            ..Default::default()
        };
        let ist = FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap();
        let now_ist = ist.with_ymd_and_hms(2026, 10, 16, 10, 0, 0).unwrap();
        assert_eq!(names(&filter(&cache, &spec, &now_ist)), vec!["Late Call"]);

        let now_utc = now_ist.with_timezone(&Utc);
        assert!(filter(&cache, &spec, &now_utc).is_empty());
    }

    #[test]
    fn missing_interviewer_never_matches() {
        let mut iv = sample_interview("9", "Solo", Status::Scheduled);
        iv.interviewer_name = None;
        let cache = vec![iv];
        let spec = FilterSpec::parse("all", "all", "interviewer", "a").unwrap();
        assert!(filter(&cache, &spec, &today()).is_empty());
    }

    #[test]
    fn result_is_subset_of_status_all() {
        let cache = cache();
        for status in ["all", "scheduled", "completed", "cancelled", "accepted"] {
            for date in ["all", "today", "upcoming", "past"] {
                let spec = FilterSpec::parse(status, date, "candidate", "a").unwrap();
                let narrow = filter(&cache, &spec, &today());
                let wide = filter(&cache, &spec.clone().with_status(StatusFilter::All), &today());
                assert!(narrow.iter().all(|iv| wide.iter().any(|w| w.id() == iv.id())));
            }
        }
    }

    #[test]
    fn malformed_spec_reports_each_part() {
        let err = FilterSpec::parse("pending", "tomorrow", "email", "x").unwrap_err();
        assert!(err.has_field("status_filter"));
        assert!(err.has_field("date_filter"));
        assert!(err.has_field("search_field"));
    }
}
