use std::collections::HashMap;
use std::sync::Arc;

use chrono::Weekday;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

use assistant_cell::CareAssistant;
use doctor_cell::{Doctor, DoctorDirectory, MapView, MarkerTarget};
use shared_models::Coordinates;

use crate::models::{Appointment, BookingError, BookingStep};
use crate::services::flow::BookingFlow;

struct SessionEntry {
    flow: BookingFlow,
    last_touched: Instant,
}

type SessionMap = RwLock<HashMap<Uuid, SessionEntry>>;

async fn update_session<T>(
    sessions: &SessionMap,
    session_id: Uuid,
    f: impl FnOnce(&mut BookingFlow) -> Result<T, BookingError>,
) -> Result<T, BookingError> {
    let mut sessions = sessions.write().await;
    let entry = sessions
        .get_mut(&session_id)
        .ok_or(BookingError::SessionNotFound(session_id))?;
    entry.last_touched = Instant::now();
    f(&mut entry.flow)
}

/// In-memory booking sessions. Each session owns one independent flow; the
/// lock is never held while an AI request is outstanding. AI calls run on
/// their own task so a dropped caller cannot leave a session loading.
pub struct BookingService {
    sessions: Arc<SessionMap>,
    assistant: Arc<dyn CareAssistant>,
    directory: Arc<DoctorDirectory>,
    user_location: Option<Coordinates>,
}

impl BookingService {
    pub fn new(
        assistant: Arc<dyn CareAssistant>,
        directory: Arc<DoctorDirectory>,
        user_location: Option<Coordinates>,
    ) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            assistant,
            directory,
            user_location,
        }
    }

    pub fn directory(&self) -> &DoctorDirectory {
        &self.directory
    }

    async fn with_session<T>(
        &self,
        session_id: Uuid,
        f: impl FnOnce(&mut BookingFlow) -> Result<T, BookingError>,
    ) -> Result<T, BookingError> {
        update_session(&self.sessions, session_id, f).await
    }

    pub async fn create_session(&self) -> (Uuid, BookingFlow) {
        let session_id = Uuid::new_v4();
        let flow = BookingFlow::new();
        self.sessions.write().await.insert(
            session_id,
            SessionEntry {
                flow: flow.clone(),
                last_touched: Instant::now(),
            },
        );
        info!("Created booking session {}", session_id);
        (session_id, flow)
    }

    pub async fn get_session(&self, session_id: Uuid) -> Result<BookingFlow, BookingError> {
        self.sessions
            .read()
            .await
            .get(&session_id)
            .map(|entry| entry.flow.clone())
            .ok_or(BookingError::SessionNotFound(session_id))
    }

    pub async fn delete_session(&self, session_id: Uuid) -> Result<(), BookingError> {
        match self.sessions.write().await.remove(&session_id) {
            Some(_) => {
                info!("Removed booking session {}", session_id);
                Ok(())
            }
            None => Err(BookingError::SessionNotFound(session_id)),
        }
    }

    /// Drops sessions untouched for `max_idle`. Sessions waiting on the
    /// assistant are kept. Returns how many were removed.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| {
            entry.flow.is_loading() || entry.last_touched.elapsed() < max_idle
        });
        before - sessions.len()
    }

    /// Periodically evicts idle sessions for the life of the process.
    pub fn spawn_idle_sweeper(service: Arc<BookingService>, max_idle: Duration) -> JoinHandle<()> {
        let every = max_idle.min(Duration::from_secs(60)).max(Duration::from_secs(1));
        tokio::spawn(async move {
            let mut sweep_interval = interval(every);
            loop {
                sweep_interval.tick().await;

                let evicted = service.evict_idle(max_idle).await;
                if evicted > 0 {
                    info!("Evicted {} idle booking sessions", evicted);
                }
            }
        })
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Step 1: records the symptoms and asks the assistant for a specialist.
    pub async fn submit_symptoms(
        &self,
        session_id: Uuid,
        symptoms: &str,
    ) -> Result<BookingFlow, BookingError> {
        let (ticket, text) = self
            .with_session(session_id, |flow| {
                flow.set_symptoms(symptoms)?;
                flow.begin_match()
            })
            .await?;

        debug!("Session {} awaiting specialist match", session_id);
        let sessions = self.sessions.clone();
        let assistant = self.assistant.clone();
        let task = tokio::spawn(async move {
            let outcome = assistant.match_symptoms(&text).await;
            update_session(&sessions, session_id, |flow| {
                flow.complete_match(ticket, outcome)?;
                Ok(flow.clone())
            })
            .await
        });

        task.await?
    }

    pub async fn visible_doctors(&self, session_id: Uuid) -> Result<Vec<Doctor>, BookingError> {
        let flow = self.get_session(session_id).await?;
        if flow.match_result().is_none() {
            return Err(BookingError::MissingSelection("specialty recommendation"));
        }
        Ok(flow.visible_doctors(&self.directory))
    }

    pub async fn set_filters(
        &self,
        session_id: Uuid,
        hospital: Option<String>,
        day: Option<String>,
    ) -> Result<Vec<Doctor>, BookingError> {
        let day = parse_day(day.as_deref())?;
        self.with_session(session_id, |flow| {
            flow.set_filters(hospital, day)?;
            Ok(flow.visible_doctors(&self.directory))
        })
        .await
    }

    pub async fn view_profile(
        &self,
        session_id: Uuid,
        doctor_id: &str,
    ) -> Result<Doctor, BookingError> {
        let doctor = self.directory.get(doctor_id)?.clone();
        self.with_session(session_id, |flow| flow.view_profile(doctor.clone()))
            .await?;
        Ok(doctor)
    }

    pub async fn close_profile(&self, session_id: Uuid) -> Result<(), BookingError> {
        self.with_session(session_id, |flow| flow.close_profile()).await
    }

    pub async fn map_view(&self, session_id: Uuid) -> Result<MapView, BookingError> {
        let flow = self.get_session(session_id).await?;
        if flow.step() != BookingStep::SpecialistSelection {
            return Err(BookingError::InvalidTransition {
                action: "show the map",
                step: flow.step(),
            });
        }
        Ok(flow.map_view(&self.directory))
    }

    pub async fn select_marker(
        &self,
        session_id: Uuid,
        marker_id: &str,
    ) -> Result<(MarkerTarget, BookingFlow), BookingError> {
        self.with_session(session_id, |flow| {
            let target = flow.select_marker(&self.directory, marker_id)?;
            Ok((target, flow.clone()))
        })
        .await
    }

    /// Step 2 -> 3.
    pub async fn select_doctor(
        &self,
        session_id: Uuid,
        doctor_id: &str,
    ) -> Result<BookingFlow, BookingError> {
        let doctor = self.directory.get(doctor_id)?.clone();
        self.with_session(session_id, |flow| {
            flow.select_doctor(doctor)?;
            Ok(flow.clone())
        })
        .await
    }

    pub async fn set_schedule(
        &self,
        session_id: Uuid,
        date: &str,
        time: &str,
    ) -> Result<BookingFlow, BookingError> {
        self.with_session(session_id, |flow| {
            flow.set_schedule(date, time)?;
            Ok(flow.clone())
        })
        .await
    }

    /// Step 3 -> 4: fetches travel guidance, then records the appointment.
    pub async fn confirm(&self, session_id: Uuid) -> Result<Appointment, BookingError> {
        let location = self.user_location;
        let (ticket, request) = self
            .with_session(session_id, |flow| flow.begin_confirmation(location))
            .await?;

        debug!("Session {} awaiting logistics for {}", session_id, request.destination);
        let sessions = self.sessions.clone();
        let assistant = self.assistant.clone();
        let task = tokio::spawn(async move {
            let outcome = assistant.navigation_advice(&request).await;
            update_session(&sessions, session_id, |flow| {
                flow.complete_confirmation(ticket, outcome).cloned()
            })
            .await
        });

        task.await?
    }

    pub async fn back(&self, session_id: Uuid) -> Result<BookingFlow, BookingError> {
        self.with_session(session_id, |flow| {
            flow.back()?;
            Ok(flow.clone())
        })
        .await
    }

    pub async fn reset(&self, session_id: Uuid) -> Result<BookingFlow, BookingError> {
        self.with_session(session_id, |flow| {
            flow.reset();
            Ok(flow.clone())
        })
        .await
    }
}

fn parse_day(day: Option<&str>) -> Result<Option<Weekday>, BookingError> {
    match day.map(str::trim) {
        None | Some("") => Ok(None),
        Some(name) => name.parse::<Weekday>().map(Some).map_err(|_| {
            warn!("Rejected day filter '{}'", name);
            BookingError::Validation(format!("unknown day '{}'", name))
        }),
    }
}
