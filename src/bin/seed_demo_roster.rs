use chrono::Local;
use std::error::Error;
use std::fs;
use std::path::Path;

use college_admin::app::{get_default_db_path, AppState};
use college_admin::domain::student::NewStudent;

const DEPARTMENTS: &[(&str, &str)] = &[
    ("CS", "Computer Science"),
    ("EE", "Electrical Engineering"),
    ("ME", "Mechanical Engineering"),
    ("CE", "Civil Engineering"),
];
const DEFAULT_PER_DEPARTMENT: usize = 12;
const OPERATOR: &str = "seed_demo_roster";

fn main() -> Result<(), Box<dyn Error>> {
    college_admin::logging::init();

    let db_path = std::env::args().nth(1).unwrap_or_else(get_default_db_path);

    let per_department = std::env::args()
        .nth(2)
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_PER_DEPARTMENT)
        .clamp(1, 500);

    backup_and_reset_db(&db_path)?;

    let state = AppState::new(db_path.clone())?;

    for (code, department) in DEPARTMENTS {
        for i in 1..=per_department {
            let roll_number = format!("{}{:03}", code, i);
            state.student_api.add_student(
                NewStudent {
                    roll_number: roll_number.clone(),
                    name: format!("{} Student {}", code, i),
                    department: department.to_string(),
                    email: Some(format!("{}@students.example.edu", roll_number.to_lowercase())),
                    mentor_email: format!("mentor.{}@example.edu", code.to_lowercase()),
                },
                OPERATOR,
            )?;
        }
    }

    eprintln!(
        "Seeded {} students into {}",
        state.student_api.count_students()?,
        db_path
    );
    Ok(())
}

fn backup_and_reset_db(db_path: &str) -> Result<(), Box<dyn Error>> {
    let path = Path::new(db_path);
    if !path.exists() {
        return Ok(());
    }

    let ts = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let backup_path = format!("{}.bak.{}", db_path, ts);
    fs::copy(path, &backup_path)?;
    fs::remove_file(path)?;

    eprintln!("Backed up {} -> {}", db_path, backup_path);
    Ok(())
}
