use herald_common::types::{HomeworkRecord, HomeworkStatus};

/// Render the chat message for a reviewed homework.
pub fn render(record: &HomeworkRecord) -> String {
    format!(
        "Your work \"{}\" has been reviewed!\n\n{}",
        record.name,
        verdict(record.status)
    )
}

/// Fixed verdict phrase for each status.
pub fn verdict(status: HomeworkStatus) -> &'static str {
    match status {
        HomeworkStatus::Rejected => "Unfortunately, the reviewer found errors in your work.",
        HomeworkStatus::Reviewing => "Your work has been taken for review.",
        HomeworkStatus::Approved => "The reviewer liked everything, your work is accepted!",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, status: HomeworkStatus) -> HomeworkRecord {
        HomeworkRecord {
            name: name.to_string(),
            status,
        }
    }

    #[test]
    fn test_rejected() {
        assert_eq!(
            render(&record("proj1", HomeworkStatus::Rejected)),
            "Your work \"proj1\" has been reviewed!\n\nUnfortunately, the reviewer found errors in your work."
        );
    }

    #[test]
    fn test_reviewing() {
        let text = render(&record("hw_api", HomeworkStatus::Reviewing));
        assert!(text.starts_with("Your work \"hw_api\""));
        assert!(text.ends_with("taken for review."));
    }

    #[test]
    fn test_approved() {
        let text = render(&record("proj1", HomeworkStatus::Approved));
        assert!(text.contains("proj1"));
        assert!(text.ends_with("your work is accepted!"));
    }
}
