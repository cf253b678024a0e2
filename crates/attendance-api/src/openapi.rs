//! OpenAPI document for the REST surface, served through Swagger UI.

use attendance_domain::{
    Attendance, AttendanceUpdate, Class, NewAttendance, NewClass, NewStudent, PatchOperation,
    Student,
};
use utoipa::OpenApi;

use crate::handlers::{attendances, classes, students};

/// Where Swagger UI is mounted; `/` redirects here
pub const DOCS_PATH: &str = "/swagger-ui";

/// Raw OpenAPI JSON served alongside the UI
pub const SPEC_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Student Attendance API",
        description = "Students, classes and attendance records behind a one-minute read-through cache"
    ),
    paths(
        students::list,
        students::create,
        students::get_by_id,
        students::update,
        students::patch,
        students::delete,
        classes::list,
        classes::create,
        classes::get_by_id,
        classes::update,
        classes::patch,
        classes::delete,
        attendances::list,
        attendances::create,
        attendances::get_by_id,
        attendances::patch,
        attendances::delete,
        attendances::get_by_pair,
        attendances::update_by_pair,
    ),
    components(schemas(
        Student,
        NewStudent,
        Class,
        NewClass,
        Attendance,
        NewAttendance,
        AttendanceUpdate,
        PatchOperation,
    )),
    tags(
        (name = "Students"),
        (name = "Classes"),
        (name = "Attendances"),
    )
)]
pub struct ApiDoc;
