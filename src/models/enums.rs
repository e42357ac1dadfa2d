//! Shared domain enums, stored as text columns

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

// ---------------------------------------------------------------------------
// ReservationStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a reservation (`estado`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pendiente,
    Confirmada,
    Pagada,
    Cancelada,
    Finalizada,
}

impl ReservationStatus {
    /// Statuses that hold the court and take part in conflict checks
    pub const ACTIVE: [ReservationStatus; 3] = [
        ReservationStatus::Pendiente,
        ReservationStatus::Confirmada,
        ReservationStatus::Pagada,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pendiente => "pendiente",
            ReservationStatus::Confirmada => "confirmada",
            ReservationStatus::Pagada => "pagada",
            ReservationStatus::Cancelada => "cancelada",
            ReservationStatus::Finalizada => "finalizada",
        }
    }

    pub fn is_active(&self) -> bool {
        Self::ACTIVE.contains(self)
    }

    pub fn is_cancelled(&self) -> bool {
        *self == ReservationStatus::Cancelada
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    /// Text values of the active statuses, for `= ANY($n)` binds
    pub fn active_values() -> Vec<String> {
        Self::ACTIVE.iter().map(|s| s.as_str().to_string()).collect()
    }
}

impl FromStr for ReservationStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pendiente" => Ok(ReservationStatus::Pendiente),
            "confirmada" => Ok(ReservationStatus::Confirmada),
            "pagada" => Ok(ReservationStatus::Pagada),
            "cancelada" => Ok(ReservationStatus::Cancelada),
            "finalizada" => Ok(ReservationStatus::Finalizada),
            _ => Err(AppError::Validation("Invalid estado value".to_string())),
        }
    }
}

impl TryFrom<String> for ReservationStatus {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PaymentStatus
// ---------------------------------------------------------------------------

/// Payment status of a reservation (`estado_pago`), independent of `estado`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    PendientePago,
    Senado,
    Pagado,
    Cancelado,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::PendientePago => "pendiente_pago",
            PaymentStatus::Senado => "senado",
            PaymentStatus::Pagado => "pagado",
            PaymentStatus::Cancelado => "cancelado",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pendiente_pago" => Ok(PaymentStatus::PendientePago),
            "senado" => Ok(PaymentStatus::Senado),
            "pagado" => Ok(PaymentStatus::Pagado),
            "cancelado" => Ok(PaymentStatus::Cancelado),
            _ => Err(AppError::Validation("Invalid estado_pago value".to_string())),
        }
    }
}

impl TryFrom<String> for PaymentStatus {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ReservationKind
// ---------------------------------------------------------------------------

/// Whether a reservation is tied to a known user or is a walk-in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReservationKind {
    #[default]
    Relacionada,
    Privada,
}

impl ReservationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationKind::Relacionada => "relacionada",
            ReservationKind::Privada => "privada",
        }
    }
}

impl FromStr for ReservationKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "relacionada" => Ok(ReservationKind::Relacionada),
            "privada" => Ok(ReservationKind::Privada),
            _ => Err(AppError::Validation("Invalid reservation kind".to_string())),
        }
    }
}

impl TryFrom<String> for ReservationKind {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// CourtState
// ---------------------------------------------------------------------------

/// Operational state of a court
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CourtState {
    Available,
    Maintenance,
    Inactive,
}

impl FromStr for CourtState {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(CourtState::Available),
            "maintenance" => Ok(CourtState::Maintenance),
            "inactive" => Ok(CourtState::Inactive),
            other => Err(AppError::Internal(format!("Unknown court state '{}'", other))),
        }
    }
}

impl TryFrom<String> for CourtState {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// TariffSource
// ---------------------------------------------------------------------------

/// Which pricing layer produced the hourly price of a reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TariffSource {
    Rule,
    CourtDay,
    CourtNight,
}

impl TariffSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TariffSource::Rule => "rule",
            TariffSource::CourtDay => "court_day",
            TariffSource::CourtNight => "court_night",
        }
    }
}

impl FromStr for TariffSource {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rule" => Ok(TariffSource::Rule),
            "court_day" => Ok(TariffSource::CourtDay),
            "court_night" => Ok(TariffSource::CourtNight),
            other => Err(AppError::Internal(format!("Unknown tariff source '{}'", other))),
        }
    }
}

impl TryFrom<String> for TariffSource {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_set() {
        assert!(ReservationStatus::Pendiente.is_active());
        assert!(ReservationStatus::Confirmada.is_active());
        assert!(ReservationStatus::Pagada.is_active());
        assert!(!ReservationStatus::Cancelada.is_active());
        assert!(!ReservationStatus::Finalizada.is_active());
        assert_eq!(
            ReservationStatus::active_values(),
            vec!["pendiente", "confirmada", "pagada"]
        );
    }

    #[test]
    fn test_unknown_values_are_rejected() {
        let err = "reservada".parse::<ReservationStatus>().unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Invalid estado value");

        let err = "PAGADO".parse::<PaymentStatus>().unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Invalid estado_pago value");
    }

    #[test]
    fn test_serde_names_match_storage() {
        let json = serde_json::to_string(&PaymentStatus::PendientePago).unwrap();
        assert_eq!(json, "\"pendiente_pago\"");
        let json = serde_json::to_string(&TariffSource::CourtNight).unwrap();
        assert_eq!(json, "\"court_night\"");
    }
}
