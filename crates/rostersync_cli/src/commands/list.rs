//! List command implementation.

use super::CliStore;
use rostersync_store::{Student, StudentStore};
use serde::Serialize;

/// Listing output.
#[derive(Debug, Serialize)]
pub struct ListResult {
    /// Number of stored students.
    pub count: usize,
    /// Number of subjects across all students.
    pub subject_count: usize,
    /// The students, in insertion order.
    pub students: Vec<Student>,
}

/// Runs the list command.
pub fn run(store: &CliStore, format: &str) -> Result<bool, Box<dyn std::error::Error>> {
    let students = store.find_all()?;
    let result = ListResult {
        count: students.len(),
        subject_count: students.iter().map(|s| s.subjects().len()).sum(),
        students,
    };

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            print!("{}", render_text(&result));
        }
    }

    Ok(true)
}

fn render_text(result: &ListResult) -> String {
    let mut out = format!(
        "Students: {} ({} subjects)\n",
        result.count, result.subject_count
    );
    for student in &result.students {
        let id = student
            .id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        let age = student
            .age
            .map(|age| age.to_string())
            .unwrap_or_else(|| "?".to_string());
        out.push_str(&format!(
            "  [{id}] {} <{}>, age {age}\n",
            student.name, student.email
        ));
        for subject in student.subjects() {
            out.push_str(&format!(
                "      {} ({} credits)\n",
                subject.name.as_deref().unwrap_or("unnamed"),
                subject.credits.unwrap_or(0)
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rostersync_store::Subject;

    #[test]
    fn text_listing() {
        let store = CliStore::open(None).unwrap();
        store
            .save(Student::new("John", "john@example.com", 20).with_subject(Subject::new("Math", 3)))
            .unwrap();

        let students = store.find_all().unwrap();
        let result = ListResult {
            count: students.len(),
            subject_count: 1,
            students,
        };

        let text = render_text(&result);
        assert!(text.starts_with("Students: 1 (1 subjects)"));
        assert!(text.contains("[1] John <john@example.com>, age 20"));
        assert!(text.contains("Math (3 credits)"));
    }
}
