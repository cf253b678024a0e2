//! Cache key naming.

pub const STUDENTS: &str = "students";
pub const CLASSES: &str = "classes";
pub const ATTENDANCES: &str = "attendances";

pub fn student(id: i64) -> String {
    format!("student:{id}")
}

pub fn class(id: i64) -> String {
    format!("class:{id}")
}

pub fn attendance(id: i64) -> String {
    format!("attendance:{id}")
}

pub fn attendance_pair(student_id: i64, class_id: i64) -> String {
    format!("attendance:{student_id}:{class_id}")
}
