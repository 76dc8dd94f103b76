use assert_matches::assert_matches;
use chrono::Weekday;

use assistant_cell::{
    AssistantError, MatchResult, NavigationAdvice, SuggestedFacility, Urgency,
};
use booking_cell::{BookingError, BookingFlow, BookingStep, PLACEHOLDER_PATIENT_NAME};
use doctor_cell::{DoctorDirectory, MarkerTarget};
use shared_models::{Coordinates, GroundingSource, Specialty};

fn cardiology_match() -> MatchResult {
    MatchResult {
        recommended_specialty: Specialty::Cardiology,
        reasoning: "Chest pain on exertion warrants a cardiac review.".to_string(),
        urgency: Urgency::High,
        suggested_facilities: vec![
            SuggestedFacility {
                name: "Institut Jantung Negara".to_string(),
                category: "Specialist Heart Centre".to_string(),
                highlight: "National referral centre".to_string(),
                coords: Some(Coordinates::new(3.1707, 101.7068)),
            },
            SuggestedFacility {
                name: "Hospital Kuala Lumpur".to_string(),
                category: "Public Hospital".to_string(),
                highlight: "24-hour emergency department".to_string(),
                coords: None,
            },
        ],
        search_sources: vec![],
    }
}

fn advice() -> NavigationAdvice {
    NavigationAdvice {
        text: "Take the LRT to KL Sentral, then a short taxi ride.".to_string(),
        sources: vec![GroundingSource {
            title: "Gleneagles KL".to_string(),
            uri: "https://gleneagles.com.my".to_string(),
        }],
    }
}

fn matched_flow() -> BookingFlow {
    let mut flow = BookingFlow::new();
    flow.set_symptoms("chest pain when climbing stairs").unwrap();
    let (ticket, _) = flow.begin_match().unwrap();
    flow.complete_match(ticket, Ok(cardiology_match())).unwrap();
    flow
}

fn scheduled_flow(directory: &DoctorDirectory) -> BookingFlow {
    let mut flow = matched_flow();
    flow.select_doctor(directory.get("1").unwrap().clone()).unwrap();
    flow.set_schedule("2026-11-02", "10:30 AM").unwrap();
    flow
}

#[test]
fn test_new_flow_starts_on_symptom_entry() {
    let flow = BookingFlow::new();

    assert_eq!(flow.step(), BookingStep::SymptomEntry);
    assert!(!flow.is_loading());
    assert!(flow.match_result().is_none());
    assert!(flow.appointment().is_none());
}

#[test]
fn test_blank_symptoms_are_rejected_without_loading() {
    let mut flow = BookingFlow::new();
    flow.set_symptoms("   ").unwrap();

    assert_matches!(flow.begin_match(), Err(BookingError::Validation(_)));
    assert!(!flow.is_loading());
}

#[test]
fn test_begin_match_trims_and_marks_loading() {
    let mut flow = BookingFlow::new();
    flow.set_symptoms("  rash on both arms \n").unwrap();

    let (_, text) = flow.begin_match().unwrap();

    assert_eq!(text, "rash on both arms");
    assert!(flow.is_loading());
    assert_matches!(flow.begin_match(), Err(BookingError::RequestInFlight));
    assert_matches!(flow.set_symptoms("other"), Err(BookingError::RequestInFlight));
}

#[test]
fn test_successful_match_advances_to_selection() {
    let flow = matched_flow();

    assert_eq!(flow.step(), BookingStep::SpecialistSelection);
    assert!(!flow.is_loading());
    assert_eq!(
        flow.match_result().unwrap().recommended_specialty,
        Specialty::Cardiology
    );
}

#[test]
fn test_failed_match_stays_on_symptom_entry() {
    let mut flow = BookingFlow::new();
    flow.set_symptoms("headache").unwrap();
    let (ticket, _) = flow.begin_match().unwrap();

    let result = flow.complete_match(ticket, Err(AssistantError::EmptyResponse));

    assert_matches!(result, Err(BookingError::Assistant(AssistantError::EmptyResponse)));
    assert_eq!(flow.step(), BookingStep::SymptomEntry);
    assert!(!flow.is_loading());
    assert!(flow.match_result().is_none());
    assert_eq!(flow.symptoms(), "headache");
}

#[test]
fn test_reset_discards_in_flight_match() {
    let mut flow = BookingFlow::new();
    flow.set_symptoms("cough").unwrap();
    let (ticket, _) = flow.begin_match().unwrap();

    flow.reset();
    let result = flow.complete_match(ticket, Ok(cardiology_match()));

    assert_matches!(result, Err(BookingError::StaleResponse));
    assert_eq!(flow.step(), BookingStep::SymptomEntry);
    assert!(flow.match_result().is_none());
    assert_eq!(flow.symptoms(), "");
}

#[test]
fn test_visible_doctors_include_general_practice() {
    let directory = DoctorDirectory::seeded();
    let flow = matched_flow();

    let ids: Vec<String> = flow
        .visible_doctors(&directory)
        .into_iter()
        .map(|d| d.id)
        .collect();

    assert_eq!(ids, vec!["1", "5"]);
}

#[test]
fn test_filters_narrow_visible_doctors() {
    let directory = DoctorDirectory::seeded();
    let mut flow = matched_flow();

    flow.set_filters(None, Some(Weekday::Wed)).unwrap();
    let ids: Vec<String> = flow.visible_doctors(&directory).into_iter().map(|d| d.id).collect();
    assert_eq!(ids, vec!["5"]);

    flow.set_filters(Some("Gleneagles Hospital Kuala Lumpur".to_string()), None)
        .unwrap();
    let ids: Vec<String> = flow.visible_doctors(&directory).into_iter().map(|d| d.id).collect();
    assert_eq!(ids, vec!["1"]);

    flow.set_filters(Some("  ".to_string()), None).unwrap();
    assert_eq!(flow.visible_doctors(&directory).len(), 2);
}

#[test]
fn test_filters_only_apply_on_selection_step() {
    let mut flow = BookingFlow::new();

    assert_matches!(
        flow.set_filters(None, Some(Weekday::Mon)),
        Err(BookingError::InvalidTransition { step: BookingStep::SymptomEntry, .. })
    );
}

#[test]
fn test_profile_of_unrelated_specialist_is_rejected() {
    let directory = DoctorDirectory::seeded();
    let mut flow = matched_flow();

    let dermatologist = directory.get("2").unwrap().clone();
    assert_matches!(flow.view_profile(dermatologist.clone()), Err(BookingError::Validation(_)));
    assert_matches!(flow.select_doctor(dermatologist), Err(BookingError::Validation(_)));
    assert_eq!(flow.step(), BookingStep::SpecialistSelection);
}

#[test]
fn test_profile_open_and_close() {
    let directory = DoctorDirectory::seeded();
    let mut flow = matched_flow();

    flow.view_profile(directory.get("5").unwrap().clone()).unwrap();
    assert_eq!(flow.profile_doctor().unwrap().name, "Dr. Jane Wong");

    flow.close_profile().unwrap();
    assert!(flow.profile_doctor().is_none());
}

#[test]
fn test_map_view_plots_doctors_and_located_facilities() {
    let directory = DoctorDirectory::seeded();
    let flow = matched_flow();

    let view = flow.map_view(&directory);
    let ids: Vec<&str> = view.markers().iter().map(|m| m.id.as_str()).collect();

    assert_eq!(ids, vec!["doctor:1", "doctor:5", "facility:0"]);
    assert!(view.bounds().is_some());
}

#[test]
fn test_doctor_marker_opens_profile() {
    let directory = DoctorDirectory::seeded();
    let mut flow = matched_flow();

    let target = flow.select_marker(&directory, "doctor:1").unwrap();

    assert_eq!(target, MarkerTarget::Doctor { doctor_id: "1".to_string() });
    assert_eq!(flow.profile_doctor().unwrap().id, "1");
    assert_eq!(flow.step(), BookingStep::SpecialistSelection);
}

#[test]
fn test_facility_marker_leaves_profile_closed() {
    let directory = DoctorDirectory::seeded();
    let mut flow = matched_flow();

    let target = flow.select_marker(&directory, "facility:0").unwrap();

    assert_matches!(target, MarkerTarget::Facility { ref name, .. } if name == "Institut Jantung Negara");
    assert!(flow.profile_doctor().is_none());
}

#[test]
fn test_unknown_marker_is_reported() {
    let directory = DoctorDirectory::seeded();
    let mut flow = matched_flow();

    assert_matches!(
        flow.select_marker(&directory, "facility:1"),
        Err(BookingError::Doctor(_))
    );
}

#[test]
fn test_select_doctor_moves_to_scheduling() {
    let directory = DoctorDirectory::seeded();
    let mut flow = matched_flow();
    flow.view_profile(directory.get("1").unwrap().clone()).unwrap();

    flow.select_doctor(directory.get("1").unwrap().clone()).unwrap();

    assert_eq!(flow.step(), BookingStep::Scheduling);
    assert_eq!(flow.selected_doctor().unwrap().id, "1");
    assert!(flow.profile_doctor().is_none());
}

#[test]
fn test_schedule_validation() {
    let directory = DoctorDirectory::seeded();
    let mut flow = matched_flow();
    flow.select_doctor(directory.get("1").unwrap().clone()).unwrap();

    assert_matches!(flow.set_schedule("02/11/2026", "09:00 AM"), Err(BookingError::Validation(_)));
    assert_matches!(flow.set_schedule("2026-11-02", "11:15 AM"), Err(BookingError::Validation(_)));

    flow.set_schedule("2026-11-02", "04:00 PM").unwrap();
    assert_eq!(flow.selected_date(), Some("2026-11-02"));
    assert_eq!(flow.selected_time(), Some("04:00 PM"));
}

#[test]
fn test_confirmation_requires_date_and_time() {
    let directory = DoctorDirectory::seeded();
    let mut flow = matched_flow();
    flow.select_doctor(directory.get("1").unwrap().clone()).unwrap();

    assert_matches!(
        flow.begin_confirmation(None),
        Err(BookingError::MissingSelection("date"))
    );
    assert!(!flow.is_loading());
}

#[test]
fn test_confirmation_builds_navigation_request() {
    let directory = DoctorDirectory::seeded();
    let mut flow = scheduled_flow(&directory);
    let here = Coordinates::new(3.139, 101.6869);

    let (_, request) = flow.begin_confirmation(Some(here)).unwrap();

    assert_eq!(request.destination, "Gleneagles Hospital Kuala Lumpur");
    assert_eq!(request.date, "2026-11-02");
    assert_eq!(request.time, "10:30 AM");
    assert_eq!(request.location, Some(here));
    assert!(flow.is_loading());
}

#[test]
fn test_successful_confirmation_records_appointment() {
    let directory = DoctorDirectory::seeded();
    let mut flow = scheduled_flow(&directory);
    let (ticket, _) = flow.begin_confirmation(None).unwrap();

    let appointment = flow.complete_confirmation(ticket, Ok(advice())).unwrap().clone();

    assert_eq!(appointment.id.len(), 9);
    assert_eq!(appointment.doctor_id, "1");
    assert_eq!(appointment.doctor_name, "Dr. Ahmad Rizal");
    assert_eq!(appointment.patient_name, PLACEHOLDER_PATIENT_NAME);
    assert_eq!(appointment.symptoms, "chest pain when climbing stairs");
    assert_eq!(appointment.location, "Gleneagles Hospital Kuala Lumpur");
    assert!(appointment.reminders_set);
    assert_eq!(flow.step(), BookingStep::Confirmation);
    assert_eq!(flow.navigation(), Some(&advice()));
}

#[test]
fn test_failed_confirmation_stays_on_scheduling() {
    let directory = DoctorDirectory::seeded();
    let mut flow = scheduled_flow(&directory);
    let (ticket, _) = flow.begin_confirmation(None).unwrap();

    let result = flow.complete_confirmation(ticket, Err(AssistantError::EmptyResponse));

    assert_matches!(result, Err(BookingError::Assistant(_)));
    assert_eq!(flow.step(), BookingStep::Scheduling);
    assert!(flow.appointment().is_none());
    assert!(!flow.is_loading());
    assert_eq!(flow.selected_time(), Some("10:30 AM"));
}

#[test]
fn test_back_navigation() {
    let directory = DoctorDirectory::seeded();
    let mut flow = scheduled_flow(&directory);

    assert_eq!(flow.back().unwrap(), BookingStep::SpecialistSelection);
    assert_eq!(flow.back().unwrap(), BookingStep::SymptomEntry);
    assert_eq!(flow.symptoms(), "chest pain when climbing stairs");
    assert_matches!(flow.back(), Err(BookingError::InvalidTransition { .. }));
}

#[test]
fn test_back_is_blocked_while_loading_and_after_confirmation() {
    let directory = DoctorDirectory::seeded();
    let mut flow = scheduled_flow(&directory);
    let (ticket, _) = flow.begin_confirmation(None).unwrap();

    assert_matches!(flow.back(), Err(BookingError::RequestInFlight));

    flow.complete_confirmation(ticket, Ok(advice())).unwrap();
    assert_matches!(
        flow.back(),
        Err(BookingError::InvalidTransition { step: BookingStep::Confirmation, .. })
    );
}

#[test]
fn test_reset_after_confirmation_clears_everything() {
    let directory = DoctorDirectory::seeded();
    let mut flow = scheduled_flow(&directory);
    let (ticket, _) = flow.begin_confirmation(None).unwrap();
    flow.complete_confirmation(ticket, Ok(advice())).unwrap();

    flow.reset();

    assert_eq!(flow.step(), BookingStep::SymptomEntry);
    assert_eq!(flow.symptoms(), "");
    assert!(flow.match_result().is_none());
    assert!(flow.selected_doctor().is_none());
    assert!(flow.selected_date().is_none());
    assert!(flow.appointment().is_none());
    assert!(flow.navigation().is_none());
}

#[test]
fn test_new_request_discards_previous_recommendation() {
    let directory = DoctorDirectory::seeded();
    let mut flow = matched_flow();
    flow.set_filters(Some("Gleneagles Hospital Kuala Lumpur".to_string()), Some(Weekday::Fri))
        .unwrap();
    flow.back().unwrap();

    flow.set_symptoms("rash").unwrap();
    let (ticket, _) = flow.begin_match().unwrap();
    assert!(flow.match_result().is_none());

    assert_matches!(
        flow.complete_match(ticket, Err(AssistantError::EmptyResponse)),
        Err(BookingError::Assistant(_))
    );
    assert_eq!(flow.step(), BookingStep::SymptomEntry);
    assert!(flow.match_result().is_none());
    assert!(flow.visible_doctors(&directory).is_empty());

    let (ticket, _) = flow.begin_match().unwrap();
    flow.complete_match(ticket, Ok(cardiology_match())).unwrap();
    assert_eq!(flow.visible_doctors(&directory).len(), 2);
}

#[test]
fn test_rematch_after_scheduling_clears_selection() {
    let directory = DoctorDirectory::seeded();
    let mut flow = scheduled_flow(&directory);
    flow.back().unwrap();
    flow.back().unwrap();

    flow.begin_match().unwrap();

    assert!(flow.selected_doctor().is_none());
    assert!(flow.selected_date().is_none());
    assert!(flow.selected_time().is_none());
}
