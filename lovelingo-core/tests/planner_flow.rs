use chrono::{Duration, NaiveTime, TimeZone, Utc};

use lovelingo_core::{
    score_quiz, ActionDraft, ForGender, LoveLanguage, MemoryRepository, NotificationSettings, Planner, Profile,
    QuietHours, ReminderKind, ReminderPriority, Tier, Verdict,
};

const USER: &str = "alex";

#[test]
fn quiz_to_recommendation_to_reminder() {
    let now = Utc.with_ymd_and_hms(2026, 9, 7, 15, 0, 0).unwrap();
    let mut planner = Planner::new(MemoryRepository::new());

    let quiz = score_quiz(&[
        LoveLanguage::QualityTime,
        LoveLanguage::QualityTime,
        LoveLanguage::PhysicalTouch,
        LoveLanguage::ActsOfService,
    ])
    .unwrap();
    let profile = Profile {
        primary: quiz.primary,
        secondary: quiz.secondary,
        gender: None,
    };

    let recs = planner.recommend_for(USER, &profile, 6).unwrap();
    assert_eq!(recs.len(), 6);
    let top = recs[0].action.clone();
    assert_eq!(top.love_language, LoveLanguage::QualityTime);

    // Disliking the top pick drops it below its old score.
    planner.record_feedback(USER, &top.id, Verdict::Disliked).unwrap();
    let after = planner.recommend_for(USER, &profile, 30).unwrap();
    let new_score = after.iter().find(|s| s.action.id == top.id).map(|s| s.score);
    assert!(new_score.is_none_or(|s| s < recs[0].score));

    // Schedule the Grand quality-time action two days out.
    let entry = planner
        .schedule_action(USER, "qt-5", (now + Duration::days(2)).date_naive(), Some(NaiveTime::from_hms_opt(15, 0, 0).unwrap()), now)
        .unwrap();

    let reminders = planner.scan_reminders(USER, now).unwrap();
    assert_eq!(reminders.len(), 1);
    assert_eq!(reminders[0].kind, ReminderKind::Reminder);
    assert_eq!(reminders[0].priority, ReminderPriority::High);
    assert_eq!(reminders[0].scheduled_action_id, entry.id);

    // Scheduled entries are no longer recommended.
    let recs = planner.recommend_for(USER, &profile, 30).unwrap();
    assert!(recs.iter().all(|s| s.action.id != "qt-5"));

    let (done, notice) = planner.complete_scheduled_action(USER, &entry.id, now + Duration::days(2)).unwrap();
    assert!(done.completed);
    assert!(notice.is_some());
    assert_eq!(planner.history(USER).unwrap().len(), 1);
}

#[test]
fn quiet_hours_hold_reminders_until_morning() {
    let mut planner = Planner::new(MemoryRepository::new());
    let settings = NotificationSettings {
        quiet_hours: QuietHours::new(
            NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        ),
        timezone: "Europe/Berlin".to_string(),
        ..NotificationSettings::default()
    };
    planner.update_settings(USER, settings).unwrap();

    // 21:00 UTC is 23:00 in Berlin during summer time.
    let night = Utc.with_ymd_and_hms(2026, 7, 10, 21, 0, 0).unwrap();
    let custom = planner
        .add_custom_action(
            USER,
            ActionDraft {
                title: "Sunrise hike".to_string(),
                description: String::new(),
                love_language: LoveLanguage::QualityTime,
                tier: Tier::Special,
                tags: vec!["outdoors".to_string()],
                for_gender: ForGender::Any,
                product_link: None,
            },
        )
        .unwrap();
    planner
        .schedule_action(USER, &custom.id, (night + Duration::hours(12)).date_naive(), None, night)
        .unwrap();

    assert!(planner.scan_reminders(USER, night).unwrap().is_empty());

    // 07:00 UTC is 09:00 local, outside quiet hours.
    let morning = Utc.with_ymd_and_hms(2026, 7, 11, 7, 0, 0).unwrap();
    let out = planner.scan_reminders(USER, morning).unwrap();
    assert!(out.iter().any(|r| r.kind == ReminderKind::Reminder));
    assert!(out.iter().all(|r| r.priority == ReminderPriority::Medium));
}
