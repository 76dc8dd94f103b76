// libs/booking-cell/src/services/flow.rs
use chrono::{NaiveDate, Weekday};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use assistant_cell::{AssistantError, MatchResult, NavigationAdvice, NavigationRequest};
use doctor_cell::{
    Doctor, DoctorDirectory, DoctorError, DoctorFilter, MapPlace, MapView,
    MarkerSelectionHandler, MarkerTarget, TIME_SLOTS,
};
use shared_models::Coordinates;

use crate::models::{
    generate_reference, Appointment, BookingError, BookingStep, PLACEHOLDER_PATIENT_NAME,
};

/// Issued when an AI request starts; the result is only applied if the ticket
/// still belongs to the current epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    epoch: u64,
    step: BookingStep,
}

/// View state of one booking: symptom entry, specialist selection, scheduling
/// and confirmation, in that order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BookingFlow {
    step: BookingStep,
    symptoms: String,
    loading: bool,
    match_result: Option<MatchResult>,
    hospital_filter: Option<String>,
    day_filter: Option<Weekday>,
    profile_doctor: Option<Doctor>,
    selected_doctor: Option<Doctor>,
    selected_date: Option<String>,
    selected_time: Option<String>,
    appointment: Option<Appointment>,
    navigation: Option<NavigationAdvice>,
    #[serde(skip)]
    epoch: u64,
}

impl BookingFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> BookingStep {
        self.step
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn symptoms(&self) -> &str {
        &self.symptoms
    }

    pub fn match_result(&self) -> Option<&MatchResult> {
        self.match_result.as_ref()
    }

    pub fn profile_doctor(&self) -> Option<&Doctor> {
        self.profile_doctor.as_ref()
    }

    pub fn selected_doctor(&self) -> Option<&Doctor> {
        self.selected_doctor.as_ref()
    }

    pub fn selected_date(&self) -> Option<&str> {
        self.selected_date.as_deref()
    }

    pub fn selected_time(&self) -> Option<&str> {
        self.selected_time.as_deref()
    }

    pub fn appointment(&self) -> Option<&Appointment> {
        self.appointment.as_ref()
    }

    pub fn navigation(&self) -> Option<&NavigationAdvice> {
        self.navigation.as_ref()
    }

    fn require_step(&self, step: BookingStep, action: &'static str) -> Result<(), BookingError> {
        if self.step != step {
            warn!("Rejected '{}' on step {}", action, self.step.number());
            return Err(BookingError::InvalidTransition { action, step: self.step });
        }
        Ok(())
    }

    fn require_idle(&self) -> Result<(), BookingError> {
        if self.loading {
            return Err(BookingError::RequestInFlight);
        }
        Ok(())
    }

    fn issue_ticket(&mut self) -> RequestTicket {
        self.epoch += 1;
        self.loading = true;
        RequestTicket { epoch: self.epoch, step: self.step }
    }

    fn redeem(&mut self, ticket: RequestTicket) -> Result<(), BookingError> {
        if ticket.epoch != self.epoch || ticket.step != self.step || !self.loading {
            debug!("Discarding response for superseded request (epoch {})", ticket.epoch);
            return Err(BookingError::StaleResponse);
        }
        self.loading = false;
        Ok(())
    }

    pub fn set_symptoms(&mut self, symptoms: &str) -> Result<(), BookingError> {
        self.require_step(BookingStep::SymptomEntry, "edit symptoms")?;
        self.require_idle()?;
        self.symptoms = symptoms.to_string();
        Ok(())
    }

    /// Starts a matching request for the current symptoms. Returns the ticket
    /// and the trimmed text to send.
    pub fn begin_match(&mut self) -> Result<(RequestTicket, String), BookingError> {
        self.require_step(BookingStep::SymptomEntry, "request a match")?;
        self.require_idle()?;

        let symptoms = self.symptoms.trim().to_string();
        if symptoms.is_empty() {
            return Err(BookingError::Validation("symptoms are required".to_string()));
        }

        self.clear_recommendation();
        Ok((self.issue_ticket(), symptoms))
    }

    /// A new request supersedes the previous recommendation and everything
    /// chosen from it.
    fn clear_recommendation(&mut self) {
        self.match_result = None;
        self.hospital_filter = None;
        self.day_filter = None;
        self.profile_doctor = None;
        self.selected_doctor = None;
        self.selected_date = None;
        self.selected_time = None;
    }

    /// Applies a matching outcome. Failure keeps the flow on symptom entry with
    /// nothing committed.
    pub fn complete_match(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<MatchResult, AssistantError>,
    ) -> Result<(), BookingError> {
        self.redeem(ticket)?;

        match outcome {
            Ok(result) => {
                info!(
                    "Matched {} (urgency {}), moving to specialist selection",
                    result.recommended_specialty,
                    result.urgency.as_str()
                );
                self.match_result = Some(result);
                self.profile_doctor = None;
                self.step = BookingStep::SpecialistSelection;
                Ok(())
            }
            Err(e) => {
                error!("Matching failed: {}", e);
                Err(e.into())
            }
        }
    }

    /// Current doctor filter: recommended specialty plus the optional hospital and day.
    pub fn filter(&self) -> Option<DoctorFilter> {
        let result = self.match_result.as_ref()?;
        Some(
            DoctorFilter::for_specialty(result.recommended_specialty)
                .with_hospital(self.hospital_filter.clone())
                .with_day(self.day_filter),
        )
    }

    pub fn visible_doctors(&self, directory: &DoctorDirectory) -> Vec<Doctor> {
        self.filter()
            .map(|f| directory.search(&f))
            .unwrap_or_default()
    }

    pub fn set_filters(
        &mut self,
        hospital: Option<String>,
        day: Option<Weekday>,
    ) -> Result<(), BookingError> {
        self.require_step(BookingStep::SpecialistSelection, "filter doctors")?;
        self.hospital_filter = hospital.filter(|h| !h.trim().is_empty());
        self.day_filter = day;
        Ok(())
    }

    fn require_candidate(&self, doctor: &Doctor) -> Result<(), BookingError> {
        let result = self
            .match_result
            .as_ref()
            .ok_or(BookingError::MissingSelection("specialty recommendation"))?;

        if !DoctorFilter::for_specialty(result.recommended_specialty).matches(doctor) {
            return Err(BookingError::Validation(format!(
                "{} is not among the recommended specialists",
                doctor.name
            )));
        }
        Ok(())
    }

    pub fn view_profile(&mut self, doctor: Doctor) -> Result<(), BookingError> {
        self.require_step(BookingStep::SpecialistSelection, "view a profile")?;
        self.require_candidate(&doctor)?;
        debug!("Viewing profile of {}", doctor.id);
        self.profile_doctor = Some(doctor);
        Ok(())
    }

    pub fn close_profile(&mut self) -> Result<(), BookingError> {
        self.require_step(BookingStep::SpecialistSelection, "close a profile")?;
        self.profile_doctor = None;
        Ok(())
    }

    pub fn select_doctor(&mut self, doctor: Doctor) -> Result<(), BookingError> {
        self.require_step(BookingStep::SpecialistSelection, "select a doctor")?;
        self.require_idle()?;
        self.require_candidate(&doctor)?;

        info!("Selected {} for scheduling", doctor.name);
        self.profile_doctor = None;
        self.selected_doctor = Some(doctor);
        self.step = BookingStep::Scheduling;
        Ok(())
    }

    /// Doctors and suggested facilities with coordinates, as map markers.
    pub fn map_view(&self, directory: &DoctorDirectory) -> MapView {
        let places: Vec<MapPlace> = self
            .match_result
            .iter()
            .flat_map(|r| r.suggested_facilities.iter())
            .map(|f| MapPlace {
                name: f.name.clone(),
                category: f.category.clone(),
                coords: f.coords,
            })
            .collect();

        MapView::new()
            .with_doctors(&self.visible_doctors(directory))
            .with_places(&places)
    }

    /// Activates a map marker. Selecting a doctor marker opens that doctor's profile.
    pub fn select_marker(
        &mut self,
        directory: &DoctorDirectory,
        marker_id: &str,
    ) -> Result<MarkerTarget, BookingError> {
        self.require_step(BookingStep::SpecialistSelection, "select a map marker")?;

        let view = self.map_view(directory);
        let mut selector = ProfileSelector::new(self, directory);
        let target = view.activate(marker_id, &mut selector)?;

        match selector.take_rejection() {
            Some(e) => Err(e),
            None => Ok(target),
        }
    }

    pub fn set_schedule(&mut self, date: &str, time: &str) -> Result<(), BookingError> {
        self.require_step(BookingStep::Scheduling, "pick a time")?;
        self.require_idle()?;

        let date = date.trim();
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| BookingError::Validation(format!("invalid date '{}', expected YYYY-MM-DD", date)))?;

        let time = time.trim();
        if !TIME_SLOTS.contains(&time) {
            return Err(BookingError::Validation(format!("'{}' is not an offered slot", time)));
        }

        self.selected_date = Some(date.to_string());
        self.selected_time = Some(time.to_string());
        Ok(())
    }

    /// Starts confirmation: validates the selection and builds the navigation
    /// request for the chosen doctor's hospital.
    pub fn begin_confirmation(
        &mut self,
        location: Option<Coordinates>,
    ) -> Result<(RequestTicket, NavigationRequest), BookingError> {
        self.require_step(BookingStep::Scheduling, "confirm")?;
        self.require_idle()?;

        let doctor = self
            .selected_doctor
            .as_ref()
            .ok_or(BookingError::MissingSelection("doctor"))?;
        let date = self
            .selected_date
            .clone()
            .ok_or(BookingError::MissingSelection("date"))?;
        let time = self
            .selected_time
            .clone()
            .ok_or(BookingError::MissingSelection("time"))?;

        let request = NavigationRequest {
            destination: doctor.hospital.clone(),
            date,
            time,
            location,
        };

        Ok((self.issue_ticket(), request))
    }

    /// Applies the navigation outcome. Only a successful call creates the
    /// appointment; a failure leaves the flow on scheduling.
    pub fn complete_confirmation(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<NavigationAdvice, AssistantError>,
    ) -> Result<&Appointment, BookingError> {
        self.redeem(ticket)?;

        let advice = outcome.map_err(|e| {
            error!("Logistics generation failed: {}", e);
            BookingError::from(e)
        })?;

        let doctor = self
            .selected_doctor
            .as_ref()
            .ok_or(BookingError::MissingSelection("doctor"))?;

        let appointment = Appointment {
            id: generate_reference(),
            doctor_id: doctor.id.clone(),
            doctor_name: doctor.name.clone(),
            patient_name: PLACEHOLDER_PATIENT_NAME.to_string(),
            symptoms: self.symptoms.clone(),
            date: self.selected_date.clone().unwrap_or_default(),
            time: self.selected_time.clone().unwrap_or_default(),
            location: doctor.hospital.clone(),
            reminders_set: true,
        };

        info!("Appointment {} confirmed with {}", appointment.id, appointment.doctor_name);
        self.navigation = Some(advice);
        self.step = BookingStep::Confirmation;
        let appointment: &Appointment = self.appointment.insert(appointment);
        Ok(appointment)
    }

    pub fn back(&mut self) -> Result<BookingStep, BookingError> {
        self.require_idle()?;
        let previous = self.step.previous().ok_or(BookingError::InvalidTransition {
            action: "go back",
            step: self.step,
        })?;

        self.profile_doctor = None;
        self.step = previous;
        Ok(previous)
    }

    /// Back to symptom entry with every transient field cleared. Any request in
    /// flight is orphaned.
    pub fn reset(&mut self) {
        *self = BookingFlow {
            epoch: self.epoch + 1,
            ..BookingFlow::default()
        };
        info!("Booking flow reset");
    }
}

/// Routes map marker activations into the flow: a doctor marker opens that
/// doctor's profile, facility markers carry no booking action.
pub struct ProfileSelector<'a> {
    flow: &'a mut BookingFlow,
    directory: &'a DoctorDirectory,
    rejection: Option<BookingError>,
}

impl<'a> ProfileSelector<'a> {
    pub fn new(flow: &'a mut BookingFlow, directory: &'a DoctorDirectory) -> Self {
        Self { flow, directory, rejection: None }
    }

    /// The flow's reason for refusing the last selection, if any.
    pub fn take_rejection(&mut self) -> Option<BookingError> {
        self.rejection.take()
    }
}

impl MarkerSelectionHandler for ProfileSelector<'_> {
    fn on_marker_selected(&mut self, target: &MarkerTarget) -> Result<(), DoctorError> {
        match target {
            MarkerTarget::Doctor { doctor_id } => {
                let doctor = self.directory.get(doctor_id)?.clone();
                if let Err(e) = self.flow.view_profile(doctor) {
                    self.rejection = Some(e);
                }
                Ok(())
            }
            MarkerTarget::Facility { name, .. } => {
                debug!("Facility marker {} selected", name);
                Ok(())
            }
        }
    }
}
