// ==========================================
// 学院教务管理系统 - 通知内容编排
// ==========================================
// 职责: 生成缺勤通知与天气预警邮件（主题 + 正文）
// 说明: 邮件正文为英文，收件方为导师/学院管理邮箱
// ==========================================

use crate::domain::attendance::AttendanceRecord;
use crate::domain::mail::OutboundMail;
use crate::domain::student::Student;
use crate::domain::types::{MailKind, DATE_FORMAT};
use crate::domain::weather::{WeatherAlertKind, WeatherAssessment, WeatherObservation};

/// 缺勤通知（发往学生导师）
pub fn absence_notice(student: &Student, record: &AttendanceRecord) -> OutboundMail {
    let subject = format!("Attendance Alert - {} Absent", student.name);
    let body = format!(
        "Attendance Alert\n\
         \n\
         Student Name: {name}\n\
         Roll Number: {roll}\n\
         Department: {dept}\n\
         Date: {date}\n\
         Hour/Period: {hour}\n\
         Status: {status}\n\
         \n\
         Please follow up with the student regarding their absence.\n",
        name = student.name,
        roll = student.roll_number,
        dept = student.department,
        date = record.date.format(DATE_FORMAT),
        hour = record.hour,
        status = record.status.label(),
    );

    OutboundMail::new(MailKind::AbsenceAlert, &student.mentor_email, subject, body)
}

/// 天气预警（发往学院管理邮箱）
///
/// # 返回
/// - None: 判定结果无需预警
pub fn weather_notice(
    observation: &WeatherObservation,
    assessment: &WeatherAssessment,
    recipient: &str,
) -> Option<OutboundMail> {
    let headline = match assessment.kind()? {
        WeatherAlertKind::SevereWeather => "⚠️ SEVERE WEATHER DETECTED - HOLIDAY RECOMMENDED",
        WeatherAlertKind::HighTemperature => "⚠️ HIGH TEMPERATURE ALERT",
    };

    let body = format!(
        "Weather Alert from College Management System\n\
         \n\
         Location: {city}\n\
         Temperature: {temp}°C\n\
         Condition: {description}\n\
         Main Condition: {main}\n\
         \n\
         {headline}\n\
         \n\
         Please review the weather conditions and consider declaring a holiday for the safety of students and staff.\n",
        city = observation.city,
        temp = observation.temperature_c,
        description = observation.description,
        main = observation.main_condition.to_lowercase(),
        headline = headline,
    );

    Some(OutboundMail::new(
        MailKind::WeatherAlert,
        recipient,
        "Weather Alert - Bad Weather Conditions Detected".to_string(),
        body,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::AttendanceStatus;
    use chrono::NaiveDate;

    fn student() -> Student {
        Student {
            student_id: "S1".to_string(),
            roll_number: "EE042".to_string(),
            name: "Ravi Kumar".to_string(),
            department: "EE".to_string(),
            email: None,
            mentor_email: "mentor.ee@college.edu".to_string(),
            created_at: chrono::Local::now().naive_local(),
        }
    }

    #[test]
    fn test_absence_notice_content() {
        let now = chrono::Local::now().naive_local();
        let record = AttendanceRecord {
            attendance_id: "A1".to_string(),
            student_id: "S1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            hour: "3".to_string(),
            status: AttendanceStatus::Absent,
            reason: None,
            created_at: now,
            updated_at: now,
        };

        let mail = absence_notice(&student(), &record);

        assert_eq!(mail.kind, MailKind::AbsenceAlert);
        assert_eq!(mail.recipient, "mentor.ee@college.edu");
        assert_eq!(mail.subject, "Attendance Alert - Ravi Kumar Absent");
        assert!(mail.body.contains("Roll Number: EE042"));
        assert!(mail.body.contains("Department: EE"));
        assert!(mail.body.contains("Date: 2024-03-05"));
        assert!(mail.body.contains("Hour/Period: 3"));
        assert!(mail.body.contains("Status: Absent"));
    }

    #[test]
    fn test_weather_notice_only_when_alerting() {
        let observation = WeatherObservation {
            city: "Mumbai".to_string(),
            temperature_c: 42.5,
            description: "clear sky".to_string(),
            main_condition: "Clear".to_string(),
            humidity_pct: Some(30.0),
            wind_speed_ms: Some(2.0),
        };
        let quiet = WeatherAssessment {
            is_bad_weather: false,
            is_high_temp: false,
            matched_keyword: None,
        };
        assert!(weather_notice(&observation, &quiet, "admin@college.edu").is_none());

        let hot = WeatherAssessment {
            is_high_temp: true,
            ..quiet
        };
        let mail = weather_notice(&observation, &hot, "admin@college.edu").unwrap();
        assert_eq!(mail.kind, MailKind::WeatherAlert);
        assert!(mail.body.contains("Temperature: 42.5°C"));
        assert!(mail.body.contains("HIGH TEMPERATURE ALERT"));
        assert!(mail.body.contains("Main Condition: clear"));
    }
}
