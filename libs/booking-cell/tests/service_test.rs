use std::sync::Arc;

use assert_matches::assert_matches;
use async_trait::async_trait;
use mockall::mock;
use tokio::sync::Notify;
use tokio::time::Duration;

use assistant_cell::{
    AssistantError, CareAssistant, MatchResult, NavigationAdvice, NavigationRequest, Urgency,
};
use booking_cell::{BookingError, BookingService, BookingStep};
use doctor_cell::DoctorDirectory;
use shared_models::{Coordinates, Specialty};

mock! {
    pub Assistant {}

    #[async_trait]
    impl CareAssistant for Assistant {
        async fn match_symptoms(&self, symptoms: &str) -> Result<MatchResult, AssistantError>;
        async fn navigation_advice(
            &self,
            request: &NavigationRequest,
        ) -> Result<NavigationAdvice, AssistantError>;
    }
}

fn dermatology_match() -> MatchResult {
    MatchResult {
        recommended_specialty: Specialty::Dermatology,
        reasoning: "Itchy rash without fever suggests a skin condition.".to_string(),
        urgency: Urgency::Low,
        suggested_facilities: vec![],
        search_sources: vec![],
    }
}

fn advice() -> NavigationAdvice {
    NavigationAdvice {
        text: "Park at the Sunway Pyramid visitor lot.".to_string(),
        sources: vec![],
    }
}

fn service_with(assistant: impl CareAssistant + 'static) -> BookingService {
    BookingService::new(
        Arc::new(assistant),
        Arc::new(DoctorDirectory::seeded()),
        Some(Coordinates::new(3.139, 101.6869)),
    )
}

/// Holds each AI call until the test releases it.
struct GatedAssistant {
    gate: Arc<Notify>,
}

#[async_trait]
impl CareAssistant for GatedAssistant {
    async fn match_symptoms(&self, _symptoms: &str) -> Result<MatchResult, AssistantError> {
        self.gate.notified().await;
        Ok(dermatology_match())
    }

    async fn navigation_advice(
        &self,
        _request: &NavigationRequest,
    ) -> Result<NavigationAdvice, AssistantError> {
        self.gate.notified().await;
        Ok(advice())
    }
}

async fn wait_until_loading(service: &BookingService, session_id: uuid::Uuid) {
    loop {
        if service.get_session(session_id).await.unwrap().is_loading() {
            return;
        }
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn test_full_booking_walkthrough() {
    let mut assistant = MockAssistant::new();
    assistant
        .expect_match_symptoms()
        .withf(|symptoms| symptoms == "itchy rash on forearms")
        .times(1)
        .returning(|_| Ok(dermatology_match()));
    assistant
        .expect_navigation_advice()
        .withf(|request| {
            request.destination == "Sunway Medical Centre"
                && request.date == "2026-11-05"
                && request.time == "02:00 PM"
                && request.location.is_some()
        })
        .times(1)
        .returning(|_| Ok(advice()));

    let service = service_with(assistant);
    let (session_id, _) = service.create_session().await;

    let flow = service
        .submit_symptoms(session_id, " itchy rash on forearms ")
        .await
        .unwrap();
    assert_eq!(flow.step(), BookingStep::SpecialistSelection);

    let doctors = service.visible_doctors(session_id).await.unwrap();
    let ids: Vec<&str> = doctors.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["2", "5"]);

    let flow = service.select_doctor(session_id, "2").await.unwrap();
    assert_eq!(flow.step(), BookingStep::Scheduling);

    service
        .set_schedule(session_id, "2026-11-05", "02:00 PM")
        .await
        .unwrap();
    let appointment = service.confirm(session_id).await.unwrap();

    assert_eq!(appointment.doctor_name, "Dr. Sarah Lim");
    assert_eq!(appointment.location, "Sunway Medical Centre");

    let flow = service.get_session(session_id).await.unwrap();
    assert_eq!(flow.step(), BookingStep::Confirmation);
    assert_eq!(flow.appointment(), Some(&appointment));
}

#[tokio::test]
async fn test_match_failure_is_reported_and_flow_stays_put() {
    let mut assistant = MockAssistant::new();
    assistant
        .expect_match_symptoms()
        .times(1)
        .returning(|_| Err(AssistantError::UnknownSpecialty("Oncology".to_string())));

    let service = service_with(assistant);
    let (session_id, _) = service.create_session().await;

    let result = service.submit_symptoms(session_id, "lump in neck").await;

    assert_matches!(
        result,
        Err(BookingError::Assistant(AssistantError::UnknownSpecialty(_)))
    );
    let flow = service.get_session(session_id).await.unwrap();
    assert_eq!(flow.step(), BookingStep::SymptomEntry);
    assert!(!flow.is_loading());
    assert_eq!(flow.symptoms(), "lump in neck");
}

#[tokio::test]
async fn test_blank_symptoms_never_reach_the_assistant() {
    let mut assistant = MockAssistant::new();
    assistant.expect_match_symptoms().never();

    let service = service_with(assistant);
    let (session_id, _) = service.create_session().await;

    assert_matches!(
        service.submit_symptoms(session_id, "  ").await,
        Err(BookingError::Validation(_))
    );
}

#[tokio::test]
async fn test_unknown_session() {
    let service = service_with(MockAssistant::new());
    let missing = uuid::Uuid::new_v4();

    assert_matches!(
        service.get_session(missing).await,
        Err(BookingError::SessionNotFound(id)) if id == missing
    );
    assert_matches!(
        service.back(missing).await,
        Err(BookingError::SessionNotFound(_))
    );
}

#[tokio::test]
async fn test_sessions_are_independent() {
    let mut assistant = MockAssistant::new();
    assistant
        .expect_match_symptoms()
        .returning(|_| Ok(dermatology_match()));

    let service = service_with(assistant);
    let (first, _) = service.create_session().await;
    let (second, _) = service.create_session().await;

    service.submit_symptoms(first, "rash").await.unwrap();

    assert_eq!(service.session_count().await, 2);
    assert_eq!(
        service.get_session(first).await.unwrap().step(),
        BookingStep::SpecialistSelection
    );
    assert_eq!(
        service.get_session(second).await.unwrap().step(),
        BookingStep::SymptomEntry
    );

    service.delete_session(first).await.unwrap();
    assert_eq!(service.session_count().await, 1);
    assert_matches!(
        service.delete_session(first).await,
        Err(BookingError::SessionNotFound(_))
    );
}

#[tokio::test]
async fn test_invalid_day_filter_is_rejected() {
    let mut assistant = MockAssistant::new();
    assistant
        .expect_match_symptoms()
        .returning(|_| Ok(dermatology_match()));

    let service = service_with(assistant);
    let (session_id, _) = service.create_session().await;
    service.submit_symptoms(session_id, "rash").await.unwrap();

    assert_matches!(
        service
            .set_filters(session_id, None, Some("Someday".to_string()))
            .await,
        Err(BookingError::Validation(_))
    );

    let doctors = service
        .set_filters(session_id, None, Some("saturday".to_string()))
        .await
        .unwrap();
    assert_eq!(doctors.len(), 1);
    assert_eq!(doctors[0].id, "2");
}

#[tokio::test]
async fn test_second_submission_while_matching_is_rejected() {
    let gate = Arc::new(Notify::new());
    let service = Arc::new(service_with(GatedAssistant { gate: gate.clone() }));
    let (session_id, _) = service.create_session().await;

    let pending = {
        let service = service.clone();
        tokio::spawn(async move { service.submit_symptoms(session_id, "rash").await })
    };
    wait_until_loading(&service, session_id).await;

    assert_matches!(
        service.submit_symptoms(session_id, "rash again").await,
        Err(BookingError::RequestInFlight)
    );
    assert_matches!(service.back(session_id).await, Err(BookingError::RequestInFlight));

    gate.notify_one();
    let flow = pending.await.unwrap().unwrap();
    assert_eq!(flow.step(), BookingStep::SpecialistSelection);
}

#[tokio::test]
async fn test_response_after_reset_is_discarded() {
    let gate = Arc::new(Notify::new());
    let service = Arc::new(service_with(GatedAssistant { gate: gate.clone() }));
    let (session_id, _) = service.create_session().await;

    let pending = {
        let service = service.clone();
        tokio::spawn(async move { service.submit_symptoms(session_id, "rash").await })
    };
    wait_until_loading(&service, session_id).await;

    service.reset(session_id).await.unwrap();
    gate.notify_one();

    assert_matches!(pending.await.unwrap(), Err(BookingError::StaleResponse));
    let flow = service.get_session(session_id).await.unwrap();
    assert_eq!(flow.step(), BookingStep::SymptomEntry);
    assert!(flow.match_result().is_none());
    assert!(!flow.is_loading());
}

#[tokio::test]
async fn test_failed_confirmation_keeps_schedule() {
    let mut assistant = MockAssistant::new();
    assistant
        .expect_match_symptoms()
        .returning(|_| Ok(dermatology_match()));
    assistant
        .expect_navigation_advice()
        .times(1)
        .returning(|_| Err(AssistantError::EmptyResponse));

    let service = service_with(assistant);
    let (session_id, _) = service.create_session().await;
    service.submit_symptoms(session_id, "rash").await.unwrap();
    service.select_doctor(session_id, "5").await.unwrap();
    service
        .set_schedule(session_id, "2026-11-05", "09:00 AM")
        .await
        .unwrap();

    assert_matches!(
        service.confirm(session_id).await,
        Err(BookingError::Assistant(AssistantError::EmptyResponse))
    );

    let flow = service.get_session(session_id).await.unwrap();
    assert_eq!(flow.step(), BookingStep::Scheduling);
    assert!(flow.appointment().is_none());
    assert_eq!(flow.selected_date(), Some("2026-11-05"));
}

#[tokio::test]
async fn test_dropped_caller_does_not_leave_session_loading() {
    let gate = Arc::new(Notify::new());
    let service = service_with(GatedAssistant { gate: gate.clone() });
    let (session_id, _) = service.create_session().await;

    let abandoned = tokio::time::timeout(
        Duration::from_millis(50),
        service.submit_symptoms(session_id, "chest pain"),
    )
    .await;
    assert!(abandoned.is_err());

    gate.notify_one();
    tokio::time::timeout(Duration::from_secs(5), async {
        while service.get_session(session_id).await.unwrap().is_loading() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();

    let flow = service.get_session(session_id).await.unwrap();
    assert_eq!(flow.step(), BookingStep::SpecialistSelection);

    let flow = service.back(session_id).await.unwrap();
    assert_eq!(flow.step(), BookingStep::SymptomEntry);
    gate.notify_one();
    let flow = service.submit_symptoms(session_id, "rash again").await.unwrap();
    assert_eq!(flow.step(), BookingStep::SpecialistSelection);
}

#[tokio::test]
async fn test_idle_sessions_are_evicted() {
    let service = service_with(MockAssistant::new());
    service.create_session().await;
    service.create_session().await;

    assert_eq!(service.evict_idle(Duration::from_secs(3600)).await, 0);
    assert_eq!(service.session_count().await, 2);

    assert_eq!(service.evict_idle(Duration::ZERO).await, 2);
    assert_eq!(service.session_count().await, 0);
}

#[tokio::test]
async fn test_eviction_spares_sessions_awaiting_the_assistant() {
    let gate = Arc::new(Notify::new());
    let service = Arc::new(service_with(GatedAssistant { gate: gate.clone() }));
    let (busy, _) = service.create_session().await;
    service.create_session().await;

    let pending = {
        let service = service.clone();
        tokio::spawn(async move { service.submit_symptoms(busy, "rash").await })
    };
    wait_until_loading(&service, busy).await;

    assert_eq!(service.evict_idle(Duration::ZERO).await, 1);

    gate.notify_one();
    let flow = pending.await.unwrap().unwrap();
    assert_eq!(flow.step(), BookingStep::SpecialistSelection);
}
