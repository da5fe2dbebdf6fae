//! Test data helpers for creating backend JSON payloads

use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};

/// Lesson payload as the backend returns it
pub fn lesson_json(id: i64, status: &str, start: DateTime<Utc>, confirmed: bool) -> Value {
    json!({
        "id": id,
        "teacherId": 10,
        "studentId": 20,
        "dateTime": start.to_rfc3339(),
        "durationMinutes": 60,
        "status": status,
        "teacherConfirmed": confirmed,
        "topic": "Past simple",
    })
}

/// A lesson that started `minutes_ago` minutes before `now`
pub fn lesson_started(id: i64, status: &str, now: DateTime<Utc>, minutes_ago: i64, confirmed: bool) -> Value {
    lesson_json(id, status, now - Duration::minutes(minutes_ago), confirmed)
}

pub fn student_json(id: i64, first_name: &str) -> Value {
    json!({
        "id": id,
        "firstName": first_name,
        "lastName": "Petrova",
        "email": format!("student{}@school.test", id),
        "phone": null,
        "level": "B1",
        "nativeLanguage": "ru",
        "managerId": 3,
        "active": true,
    })
}

pub fn teacher_json(id: i64) -> Value {
    json!({
        "id": id,
        "firstName": "John",
        "lastName": "Baker",
        "email": format!("teacher{}@school.test", id),
        "languages": ["English", "German"],
        "hourlyRate": 25.0,
        "active": true,
    })
}

pub fn group_lesson_json(id: i64, start: DateTime<Utc>, student_ids: &[i64], max_students: u32) -> Value {
    json!({
        "id": id,
        "teacherId": 10,
        "title": "Conversation club",
        "language": "English",
        "level": "B2",
        "dateTime": start.to_rfc3339(),
        "durationMinutes": 90,
        "maxStudents": max_students,
        "studentIds": student_ids,
        "status": "SCHEDULED",
    })
}

pub fn package_json(id: i64, student_id: i64, remaining: u32) -> Value {
    json!({
        "id": id,
        "studentId": student_id,
        "name": "10 lessons",
        "totalLessons": 10,
        "remainingLessons": remaining,
        "price": 200.0,
        "currency": "USD",
    })
}

pub fn notification_json(id: i64, status: &str, priority: &str) -> Value {
    json!({
        "id": id,
        "recipientId": 1,
        "title": "Lesson reminder",
        "message": "Your lesson starts in one hour",
        "type": "REMINDER",
        "priority": priority,
        "status": status,
        "createdAt": Utc::now().to_rfc3339(),
    })
}

/// Spring-style page envelope
pub fn page_json(content: Vec<Value>) -> Value {
    let total = content.len();
    json!({
        "content": content,
        "totalElements": total,
        "totalPages": 1,
        "number": 0,
    })
}
