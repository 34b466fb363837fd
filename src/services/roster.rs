//! roster.rs
//!
//! Сервис ростера мест: загрузка с бэкенда, фильтрация, сортировка и
//! операции над местами (освободить, заменить ученика, статус, срок).
//!
//! Каждая загрузка получает монотонный номер запроса. Результат становится
//! "текущим ростером" только если более новая загрузка ещё не успела его
//! записать, поэтому запоздавший ответ не затирает свежий.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use validator::Validate;

use crate::backend::{BackendClient, StudentAssignment};
use crate::error::{ServiceError, ServiceResult};
use crate::roster::{filter_and_sort, DaySuffixTable, FilterSelection, RosterEntry, RosterSource};

/// Последний зафиксированный ростер.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RosterSnapshot {
    pub token: u64,
    pub selection: FilterSelection,
    pub entries: Vec<RosterEntry>,
}

/// Результат операции над местом. `roster` пуст, если перезагрузка после
/// успешной операции не удалась.
#[derive(Debug, Clone, Serialize)]
pub struct SeatUpdate {
    pub message: String,
    pub roster: Option<Vec<RosterEntry>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReplaceStudentRequest {
    #[serde(deserialize_with = "crate::models::de::label")]
    #[validate(length(min = 1, message = "is required"))]
    pub seat_no: String,
    #[validate(length(min = 1, message = "is required"))]
    pub name: String,
    #[serde(default)]
    pub day_type: String,
    #[serde(default)]
    pub charge: Option<i64>,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub status: String,
}

impl ReplaceStudentRequest {
    fn is_vacating(&self) -> bool {
        self.name.trim().eq_ignore_ascii_case("vacant")
    }

    fn into_assignment(self) -> ServiceResult<StudentAssignment> {
        let filled = |s: &str| !s.trim().is_empty();
        match self.charge {
            Some(charge) if filled(&self.day_type) && filled(&self.start_date) && filled(&self.status) => {
                Ok(StudentAssignment {
                    seat_no: self.seat_no,
                    name: self.name,
                    day_type: self.day_type,
                    charge,
                    start_date: self.start_date,
                    phone: self.phone,
                    status: self.status,
                })
            }
            _ => Err(ServiceError::Validation("All fields must be filled correctly.".to_string())),
        }
    }
}

/// `pending` -> `Done`, всё остальное -> `Pending`.
pub fn next_status(current: &str) -> &'static str {
    if current.trim().eq_ignore_ascii_case("pending") {
        "Done"
    } else {
        "Pending"
    }
}

fn require_seat(seat_no: &str) -> ServiceResult<()> {
    if seat_no.trim().is_empty() {
        return Err(ServiceError::Validation("seat_no is required".to_string()));
    }
    Ok(())
}

pub struct RosterService {
    backend: BackendClient,
    suffixes: DaySuffixTable,
    sequence: AtomicU64,
    current: RwLock<RosterSnapshot>,
}

impl RosterService {
    pub fn new(backend: BackendClient, suffixes: DaySuffixTable) -> Self {
        Self {
            backend,
            suffixes,
            sequence: AtomicU64::new(0),
            current: RwLock::new(RosterSnapshot::default()),
        }
    }

    /// Загружает ростер для выбранных фильтров и возвращает его вызывающему.
    pub async fn refresh(&self, selection: FilterSelection) -> ServiceResult<Vec<RosterEntry>> {
        let token = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("roster refresh #{} ({})", token, selection);

        let records = match selection.source() {
            RosterSource::Full => self.backend.students().await?,
            RosterSource::Expired => self.backend.expired_students().await?,
        };

        let entries: Vec<RosterEntry> = filter_and_sort(records, &selection)
            .into_iter()
            .map(|record| RosterEntry::new(record, &self.suffixes))
            .collect();

        let mut current = self.current.write().await;
        if token > current.token {
            *current = RosterSnapshot { token, selection, entries: entries.clone() };
        } else {
            debug!("roster refresh #{} is stale (current #{}), not committed", token, current.token);
        }

        Ok(entries)
    }

    pub async fn current(&self) -> RosterSnapshot {
        self.current.read().await.clone()
    }

    async fn refresh_after(&self, message: String) -> SeatUpdate {
        let selection = self.current.read().await.selection;
        let roster = match self.refresh(selection).await {
            Ok(entries) => Some(entries),
            Err(e) => {
                warn!("roster reload after update failed: {}", e);
                None
            }
        };
        SeatUpdate { message, roster }
    }

    pub async fn vacate_seat(&self, seat_no: &str) -> ServiceResult<SeatUpdate> {
        require_seat(seat_no)?;
        self.backend.replace_student(&StudentAssignment::vacant(seat_no)).await?;
        info!("seat {} vacated", seat_no);
        Ok(self.refresh_after(format!("Seat {seat_no} vacated")).await)
    }

    pub async fn replace_student(&self, request: ReplaceStudentRequest) -> ServiceResult<SeatUpdate> {
        request.validate()?;
        if request.is_vacating() {
            return self.vacate_seat(&request.seat_no).await;
        }

        let assignment = request.into_assignment()?;
        self.backend.replace_student(&assignment).await?;
        info!("seat {} assigned to {}", assignment.seat_no, assignment.name);
        Ok(self
            .refresh_after(format!("Student {} added to seat {}", assignment.name, assignment.seat_no))
            .await)
    }

    pub async fn toggle_status(&self, seat_no: &str, current_status: &str) -> ServiceResult<SeatUpdate> {
        require_seat(seat_no)?;
        let new_status = next_status(current_status);
        self.backend.update_status(seat_no, new_status).await?;
        info!("seat {} marked {}", seat_no, new_status);
        Ok(self.refresh_after(format!("Seat {seat_no} marked {new_status}")).await)
    }

    pub async fn update_expiry(&self, seat_no: &str, name: &str, new_expiry: &str) -> ServiceResult<SeatUpdate> {
        require_seat(seat_no)?;
        if new_expiry.trim().is_empty() {
            return Err(ServiceError::Validation("new_expiry is required".to_string()));
        }
        self.backend.update_expiry(seat_no, name, new_expiry.trim()).await?;
        info!("expiry for seat {} set to {}", seat_no, new_expiry.trim());
        Ok(self.refresh_after(format!("Expiry updated for {name}")).await)
    }
}
