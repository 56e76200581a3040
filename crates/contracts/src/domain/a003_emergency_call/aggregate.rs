use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::lifecycle::{CallAction, CallStatus, TransitionError};
use crate::domain::common::{new_id, AggregateRoot, EntityMetadata, Place};
use crate::string_enum;

string_enum! {
    pub enum CallPriority {
        Critical => ("critical", "Critical"),
        High => ("high", "High"),
        Medium => ("medium", "Medium"),
        Low => ("low", "Low"),
    }
}

string_enum! {
    /// Channel the request came in through
    pub enum RequestSource {
        PhoneCall => ("phone_call", "Phone Call"),
        System => ("system", "System"),
        MobileApp => ("mobile_app", "Mobile App"),
        WebPortal => ("web_portal", "Web Portal"),
    }
}

string_enum! {
    /// Category of entity that originated the request
    pub enum RequesterType {
        Individual => ("individual", "Individual"),
        Hospital => ("hospital", "Hospital"),
        Clinic => ("clinic", "Clinic"),
        NursingHome => ("nursing_home", "Nursing Home"),
        EmergencyServices => ("emergency_services", "Emergency Services"),
    }
}

impl CallPriority {
    /// Sort key, most urgent first
    pub fn rank(&self) -> u8 {
        match self {
            CallPriority::Critical => 0,
            CallPriority::High => 1,
            CallPriority::Medium => 2,
            CallPriority::Low => 3,
        }
    }
}

/// Extra details for requests made on behalf of an organization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequesterDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_number: Option<String>,
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// A request for an ambulance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyCall {
    pub id: String,
    pub caller_name: String,
    pub caller_phone: String,
    pub location: Place,
    pub priority: CallPriority,
    pub status: CallStatus,
    pub description: String,
    pub assigned_ambulance_id: Option<String>,
    pub dispatcher_id: Option<String>,
    pub patient_id: Option<String>,
    pub request_source: RequestSource,
    pub requester_type: RequesterType,
    #[serde(default)]
    pub requester_details: RequesterDetails,
    /// Minutes from intake to assignment
    pub response_time: Option<i32>,
    #[serde(flatten)]
    pub metadata: EntityMetadata,
}

impl EmergencyCall {
    /// Intake: every call starts `pending` with no ambulance
    pub fn new_for_insert(dto: EmergencyCallDto, dispatcher_id: Option<String>) -> Self {
        Self {
            id: new_id(),
            caller_name: dto.caller_name.trim().to_string(),
            caller_phone: dto.caller_phone.trim().to_string(),
            location: dto.location,
            priority: dto.priority,
            status: CallStatus::Pending,
            description: dto.description,
            assigned_ambulance_id: None,
            dispatcher_id,
            patient_id: dto.patient_id,
            request_source: dto.request_source,
            requester_type: dto.requester_type,
            requester_details: dto.requester_details,
            response_time: None,
            metadata: EntityMetadata::new(),
        }
    }

    /// Edit descriptive fields. Status and assignment are untouched.
    pub fn update(&mut self, dto: EmergencyCallDto) {
        self.caller_name = dto.caller_name.trim().to_string();
        self.caller_phone = dto.caller_phone.trim().to_string();
        self.location = dto.location;
        self.priority = dto.priority;
        self.description = dto.description;
        self.patient_id = dto.patient_id;
        self.request_source = dto.request_source;
        self.requester_type = dto.requester_type;
        self.requester_details = dto.requester_details;
    }

    /// Attach an ambulance to a pending call
    pub fn assign(
        &mut self,
        ambulance_id: &str,
        dispatcher_id: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<(), TransitionError> {
        self.status = self.status.apply(CallAction::Assign)?;
        self.assigned_ambulance_id = Some(ambulance_id.to_string());
        if dispatcher_id.is_some() {
            self.dispatcher_id = dispatcher_id;
        }
        let minutes = (now - self.metadata.created_at).num_minutes().max(0);
        self.response_time = Some(i32::try_from(minutes).unwrap_or(i32::MAX));
        Ok(())
    }

    /// Move along the lifecycle; assignment has its own method
    pub fn advance(&mut self, action: CallAction) -> Result<CallStatus, TransitionError> {
        let next = self.status.apply(action)?;
        self.status = next;
        Ok(next)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.caller_name.is_empty() {
            return Err("Caller name cannot be empty".into());
        }
        if self.caller_phone.is_empty() {
            return Err("Caller phone cannot be empty".into());
        }
        if self.description.trim().is_empty() {
            return Err("Description cannot be empty".into());
        }
        self.location.validate()?;
        if self.status == CallStatus::Pending && self.assigned_ambulance_id.is_some() {
            return Err("A pending call cannot have an ambulance".into());
        }
        Ok(())
    }
}

impl AggregateRoot for EmergencyCall {
    fn id(&self) -> &str {
        &self.id
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.metadata
    }

    fn aggregate_index() -> &'static str {
        "a003"
    }

    fn collection_name() -> &'static str {
        "emergency_call"
    }

    fn element_name() -> &'static str {
        "Emergency call"
    }

    fn list_name() -> &'static str {
        "Emergency calls"
    }
}

// ============================================================================
// DTOs
// ============================================================================

/// Intake / edit form of a call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyCallDto {
    pub caller_name: String,
    pub caller_phone: String,
    pub location: Place,
    pub priority: CallPriority,
    pub description: String,
    #[serde(default)]
    pub patient_id: Option<String>,
    pub request_source: RequestSource,
    pub requester_type: RequesterType,
    #[serde(default)]
    pub requester_details: RequesterDetails,
}

/// Body of the assign endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignAmbulanceDto {
    pub ambulance_id: String,
}

/// Body of the status endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallStatusUpdateDto {
    pub status: CallStatus,
}
