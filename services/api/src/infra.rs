use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use promotion_desk::workflows::promotion::{
    AcademicTitle, ActivityCategory, CategoryRule, CriteriaDraft, Notification, Notifier,
    NotifyError,
};
use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

/// Number of notifications kept for inspection; older ones are dropped.
const OUTBOX_CAPACITY: usize = 256;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Notifier that logs each message and keeps the most recent ones in memory.
#[derive(Default)]
pub(crate) struct LoggingNotifier {
    sent: Mutex<VecDeque<Notification>>,
}

impl LoggingNotifier {
    pub(crate) fn sent(&self) -> Vec<Notification> {
        self.sent
            .lock()
            .map(|sent| sent.iter().cloned().collect())
            .unwrap_or_default()
    }
}

impl Notifier for LoggingNotifier {
    fn publish(&self, notification: Notification) -> Result<(), NotifyError> {
        tracing::info!(
            template = %notification.template,
            recipient = %notification.recipient,
            "notification queued"
        );
        let mut sent = self
            .sent
            .lock()
            .map_err(|_| NotifyError::Transport("outbox lock poisoned".to_string()))?;
        if sent.len() == OUTBOX_CAPACITY {
            sent.pop_front();
        }
        sent.push_back(notification);
        Ok(())
    }
}

fn rule(
    category: ActivityCategory,
    min_points: Option<f32>,
    max_points: Option<f32>,
    min_count: Option<u32>,
) -> CategoryRule {
    CategoryRule {
        category,
        min_points,
        max_points,
        min_count,
    }
}

/// Faculty-wide requirements used when no criteria have been configured yet.
pub(crate) fn default_criteria(title: AcademicTitle) -> CriteriaDraft {
    use ActivityCategory::*;

    let (minimum_total, rules) = match title {
        AcademicTitle::AssistantProfessor => (
            60.0,
            vec![
                rule(IndexedArticle, None, None, Some(1)),
                rule(Citation, None, Some(10.0), None),
                rule(Teaching, None, Some(10.0), None),
            ],
        ),
        AcademicTitle::AssociateProfessor => (
            100.0,
            vec![
                rule(IndexedArticle, Some(60.0), None, Some(2)),
                rule(ConferencePaper, None, Some(20.0), None),
                rule(Citation, None, Some(20.0), None),
                rule(Teaching, None, Some(10.0), None),
            ],
        ),
        AcademicTitle::Professor => (
            150.0,
            vec![
                rule(IndexedArticle, Some(90.0), None, Some(3)),
                rule(ThesisSupervision, None, None, Some(1)),
                rule(ConferencePaper, None, Some(20.0), None),
                rule(Citation, None, Some(30.0), None),
                rule(Teaching, None, Some(10.0), None),
            ],
        ),
    };

    CriteriaDraft {
        academic_title: Some(title),
        department: None,
        minimum_total: Some(minimum_total),
        rules,
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_title(raw: &str) -> Result<AcademicTitle, String> {
    AcademicTitle::from_code(raw).ok_or_else(|| {
        let known: Vec<&str> = AcademicTitle::ALL.iter().map(|title| title.code()).collect();
        format!("unknown academic title '{raw}' (expected one of {})", known.join(", "))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use promotion_desk::workflows::promotion::UserId;
    use promotion_desk::workflows::promotion::validation::validate_criteria;
    use std::collections::BTreeMap;

    #[test]
    fn default_criteria_are_valid_for_every_title() {
        for title in AcademicTitle::ALL {
            let fields = validate_criteria(default_criteria(title)).expect("valid defaults");
            assert_eq!(fields.academic_title, title);
        }
    }

    #[test]
    fn outbox_keeps_the_latest_notifications() {
        let notifier = LoggingNotifier::default();
        for index in 0..(OUTBOX_CAPACITY + 2) {
            notifier
                .publish(Notification {
                    template: format!("n{index}"),
                    recipient: UserId::from("usr-000001"),
                    details: BTreeMap::new(),
                })
                .expect("published");
        }

        let sent = notifier.sent();
        assert_eq!(sent.len(), OUTBOX_CAPACITY);
        assert_eq!(sent[0].template, "n2");
    }

    #[test]
    fn parses_dates_and_titles() {
        assert_eq!(
            parse_date(" 2026-04-10 "),
            Ok(NaiveDate::from_ymd_opt(2026, 4, 10).expect("valid"))
        );
        assert!(parse_date("10/04/2026").is_err());
        assert_eq!(parse_title("Professor"), Ok(AcademicTitle::Professor));
        assert!(parse_title("lecturer")
            .unwrap_err()
            .contains("assistant_professor"));
    }
}
