use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::handlers::fetch_event_for_organizer;
use crate::models::event::{slugify, Event, EventStatus};
use crate::models::notification::NotificationKind;
use crate::models::registration::RegistrationStatus;
use crate::services::notifications;
use crate::services::registration::lock_event_by_slug;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

#[derive(Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: Option<String>,
    pub venue: String,
    pub city: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub total_seats: i32,
    #[serde(default)]
    pub ticket_price: Decimal,
}

#[derive(Deserialize)]
pub struct EventListQuery {
    pub search: Option<String>,
    pub city: Option<String>,
    #[serde(default)]
    pub upcoming: bool,
}

#[derive(Serialize)]
pub struct EventDetail {
    #[serde(flatten)]
    pub event: Event,
    pub registration_count: i64,
    pub is_full: bool,
}

/// Create a new event in `draft`. The slug and the seat ledger are computed
/// here, at construction time, never as persistence side effects.
pub async fn create_event(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateEventRequest>,
) -> Result<Response, AppError> {
    let title = req.title.trim();
    if title.is_empty() || title.len() > 200 {
        return Err(AppError::ValidationError(
            "Title must be between 1 and 200 characters".to_string(),
        ));
    }
    if req.total_seats < 1 {
        return Err(AppError::ValidationError(
            "An event needs at least one seat".to_string(),
        ));
    }
    if req.end_time <= req.start_time {
        return Err(AppError::ValidationError(
            "End time must be after start time".to_string(),
        ));
    }
    if req.ticket_price < Decimal::ZERO {
        return Err(AppError::ValidationError(
            "Ticket price cannot be negative".to_string(),
        ));
    }

    let now = Utc::now();

    // Slug allocation can race with a concurrent create of the same title;
    // on a slug collision, pick the next candidate and try again
    let event = loop {
        let slug = unique_slug(&state, title).await?;

        let inserted = sqlx::query_as::<_, Event>(
            "INSERT INTO events
                 (id, organizer_id, title, slug, description, venue, city,
                  start_time, end_time, status, total_seats, available_seats,
                  ticket_price, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11, $12, $13, $13)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user.id)
        .bind(title)
        .bind(&slug)
        .bind(&req.description)
        .bind(&req.venue)
        .bind(&req.city)
        .bind(req.start_time)
        .bind(req.end_time)
        .bind(EventStatus::Draft)
        .bind(req.total_seats)
        .bind(req.ticket_price)
        .bind(now)
        .fetch_one(&state.pool)
        .await;

        match inserted {
            Ok(event) => break event,
            Err(e) if is_slug_conflict(&e) => continue,
            Err(e) => return Err(e.into()),
        }
    };

    tracing::info!(event = %event.slug, organizer = %user.id, "Event created");

    Ok(created(event, "Event created successfully").into_response())
}

fn is_slug_conflict(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => {
            db.is_unique_violation() && db.constraint() == Some("events_slug_key")
        }
        _ => false,
    }
}

#[derive(Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub venue: Option<String>,
    pub city: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub total_seats: Option<i32>,
    pub ticket_price: Option<Decimal>,
}

/// Edit event details. Organizer-only; the slug never changes once minted.
/// Attendees are notified only when something they care about (date, venue,
/// price) actually changed.
pub async fn update_event(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<Response, AppError> {
    let mut tx = state.pool.begin().await?;

    let mut event = lock_event_by_slug(&mut tx, &slug).await?;
    event.ensure_organized_by(user.id)?;
    event.ensure_editable()?;

    let changes = apply_event_update(&mut event, &req)?;

    let event = sqlx::query_as::<_, Event>(
        "UPDATE events
         SET title = $1, description = $2, venue = $3, city = $4,
             start_time = $5, end_time = $6, total_seats = $7,
             available_seats = $8, ticket_price = $9, updated_at = $10
         WHERE id = $11
         RETURNING *",
    )
    .bind(&event.title)
    .bind(&event.description)
    .bind(&event.venue)
    .bind(&event.city)
    .bind(event.start_time)
    .bind(event.end_time)
    .bind(event.total_seats)
    .bind(event.available_seats)
    .bind(event.ticket_price)
    .bind(Utc::now())
    .bind(event.id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(event = %event.slug, organizer = %user.id, "Event updated");

    if !changes.is_empty() {
        notifications::dispatch_event_broadcast(
            state.pool.clone(),
            event.clone(),
            NotificationKind::EventUpdated,
        );
    }

    Ok(success(event, "Event updated successfully").into_response())
}

/// Fold the partial update into the event, collecting the changes attendees
/// should hear about (date, venue, price).
fn apply_event_update(event: &mut Event, req: &UpdateEventRequest) -> Result<Vec<String>, AppError> {
    let mut changes = Vec::new();

    if let Some(ref title) = req.title {
        let title = title.trim();
        if title.is_empty() || title.len() > 200 {
            return Err(AppError::ValidationError(
                "Title must be between 1 and 200 characters".to_string(),
            ));
        }
        event.title = title.to_string();
    }
    if let Some(ref description) = req.description {
        event.description = Some(description.clone());
    }
    if let Some(ref venue) = req.venue {
        if *venue != event.venue {
            changes.push(format!("Venue changed to {}", venue));
        }
        event.venue = venue.clone();
    }
    if let Some(ref city) = req.city {
        event.city = city.clone();
    }
    if let Some(start_time) = req.start_time {
        if start_time != event.start_time {
            changes.push(format!("Date/time changed to {}", start_time));
        }
        event.start_time = start_time;
    }
    if let Some(end_time) = req.end_time {
        event.end_time = end_time;
    }
    if event.end_time <= event.start_time {
        return Err(AppError::ValidationError(
            "End time must be after start time".to_string(),
        ));
    }
    if let Some(ticket_price) = req.ticket_price {
        if ticket_price < Decimal::ZERO {
            return Err(AppError::ValidationError(
                "Ticket price cannot be negative".to_string(),
            ));
        }
        if ticket_price != event.ticket_price {
            changes.push(format!("Price changed to {}", ticket_price));
        }
        event.ticket_price = ticket_price;
    }
    if let Some(total_seats) = req.total_seats {
        event.resize_seating(total_seats)?;
    }

    Ok(changes)
}

pub async fn publish_event(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let event = transition_event(&state, &user, &slug, |event| event.publish()).await?;

    notifications::dispatch(
        state.pool.clone(),
        notifications::event_message(NotificationKind::EventPublished, &event, event.organizer_id),
    );

    Ok(success(event, "Event published").into_response())
}

pub async fn cancel_event(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let event = transition_event(&state, &user, &slug, |event| event.cancel()).await?;

    // Everyone holding a confirmed seat hears about it, off the request path
    notifications::dispatch_event_broadcast(
        state.pool.clone(),
        event.clone(),
        NotificationKind::EventCancelled,
    );

    Ok(success(event, "Event cancelled").into_response())
}

pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventListQuery>,
) -> Result<Response, AppError> {
    let events = sqlx::query_as::<_, Event>(
        "SELECT * FROM events
         WHERE status = 'published'
           AND ($1::text IS NULL
                OR title ILIKE '%' || $1 || '%'
                OR description ILIKE '%' || $1 || '%'
                OR city ILIKE '%' || $1 || '%')
           AND ($2::text IS NULL OR city ILIKE $2)
           AND (NOT $3 OR start_time >= $4)
         ORDER BY start_time",
    )
    .bind(query.search)
    .bind(query.city)
    .bind(query.upcoming)
    .bind(Utc::now())
    .fetch_all(&state.pool)
    .await?;

    Ok(success(events, "Events retrieved").into_response())
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE slug = $1")
        .bind(&slug)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event '{}' was not found", slug)))?;

    let registration_count: i64 = sqlx::query_scalar(
        "SELECT count(*) FROM registrations WHERE event_id = $1 AND status = $2",
    )
    .bind(event.id)
    .bind(RegistrationStatus::Confirmed)
    .fetch_one(&state.pool)
    .await?;

    let is_full = event.is_full();

    Ok(success(
        EventDetail {
            event,
            registration_count,
            is_full,
        },
        "Event retrieved",
    )
    .into_response())
}

#[derive(Deserialize)]
pub struct MyEventsQuery {
    pub status: Option<EventStatus>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct OrganizerEventRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub event: Event,
    pub registration_count: i64,
}

#[derive(Serialize)]
pub struct MyEventsPayload {
    pub events: Vec<OrganizerEventRow>,
    pub total_events: usize,
    pub published_events: usize,
    pub draft_events: usize,
}

/// The organizer's own events (drafts included), newest first, with
/// registration counts. The published/draft tallies always cover the whole
/// portfolio, even when a status filter narrows the list.
pub async fn my_events(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<MyEventsQuery>,
) -> Result<Response, AppError> {
    let rows = sqlx::query_as::<_, OrganizerEventRow>(
        "SELECT e.*,
                count(r.id) FILTER (WHERE r.status <> 'cancelled') AS registration_count
         FROM events e
         LEFT JOIN registrations r ON r.event_id = e.id
         WHERE e.organizer_id = $1
         GROUP BY e.id
         ORDER BY e.created_at DESC",
    )
    .bind(user.id)
    .fetch_all(&state.pool)
    .await?;

    let payload = summarize_my_events(rows, query.status);

    Ok(success(payload, "Events retrieved").into_response())
}

fn summarize_my_events(
    rows: Vec<OrganizerEventRow>,
    status_filter: Option<EventStatus>,
) -> MyEventsPayload {
    let published_events = rows
        .iter()
        .filter(|r| r.event.status == EventStatus::Published)
        .count();
    let draft_events = rows
        .iter()
        .filter(|r| r.event.status == EventStatus::Draft)
        .count();

    let events: Vec<OrganizerEventRow> = match status_filter {
        Some(status) => rows.into_iter().filter(|r| r.event.status == status).collect(),
        None => rows,
    };

    MyEventsPayload {
        total_events: events.len(),
        events,
        published_events,
        draft_events,
    }
}

#[derive(Debug, Serialize, FromRow)]
pub struct AttendeeRow {
    pub registration_id: Uuid,
    pub attendee_name: String,
    pub attendee_email: String,
    pub status: RegistrationStatus,
    pub number_of_tickets: i32,
    pub ticket_number: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct AttendeeStats {
    pub total_attendees: usize,
    pub total_tickets: i32,
    pub confirmed_count: usize,
    pub attended_count: usize,
    pub pending_count: usize,
    pub total_revenue: Decimal,
}

#[derive(Serialize)]
pub struct AttendeesPayload {
    pub attendees: Vec<AttendeeRow>,
    pub stats: AttendeeStats,
}

/// Attendee roster with aggregate counts and revenue. Organizer-only.
pub async fn event_attendees(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let event = fetch_event_for_organizer(&state, &user, &slug).await?;

    let attendees = sqlx::query_as::<_, AttendeeRow>(
        "SELECT r.id AS registration_id, u.name AS attendee_name,
                u.email AS attendee_email, r.status, r.number_of_tickets,
                r.ticket_number, r.created_at
         FROM registrations r
         JOIN users u ON u.id = r.user_id
         WHERE r.event_id = $1 AND r.status <> 'cancelled'
         ORDER BY r.created_at DESC",
    )
    .bind(event.id)
    .fetch_all(&state.pool)
    .await?;

    let stats = attendee_stats(&attendees, event.ticket_price);

    Ok(success(AttendeesPayload { attendees, stats }, "Attendees retrieved").into_response())
}

fn attendee_stats(attendees: &[AttendeeRow], ticket_price: Decimal) -> AttendeeStats {
    let total_tickets: i32 = attendees.iter().map(|a| a.number_of_tickets).sum();
    AttendeeStats {
        total_attendees: attendees.len(),
        total_tickets,
        confirmed_count: attendees
            .iter()
            .filter(|a| a.status == RegistrationStatus::Confirmed)
            .count(),
        attended_count: attendees
            .iter()
            .filter(|a| a.status == RegistrationStatus::Attended)
            .count(),
        pending_count: attendees
            .iter()
            .filter(|a| a.status == RegistrationStatus::Pending)
            .count(),
        total_revenue: ticket_price * Decimal::from(total_tickets),
    }
}

#[derive(Deserialize)]
pub struct BulkMessageRequest {
    pub subject: String,
    pub body: String,
}

/// Bulk message to all confirmed attendees, reporting sent/failed counts.
/// Organizer-only.
pub async fn notify_attendees(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
    Json(req): Json<BulkMessageRequest>,
) -> Result<Response, AppError> {
    if req.subject.trim().is_empty() {
        return Err(AppError::ValidationError(
            "Subject cannot be empty".to_string(),
        ));
    }

    let event = fetch_event_for_organizer(&state, &user, &slug).await?;
    let report =
        notifications::send_bulk_message(&state.pool, &event, &req.subject, &req.body).await?;

    let message = format!(
        "Notification sent to {} attendee(s), {} failed",
        report.sent, report.failed
    );
    Ok(success(report, message).into_response())
}

async fn transition_event<F>(
    state: &AppState,
    user: &AuthUser,
    slug: &str,
    apply: F,
) -> Result<Event, AppError>
where
    F: FnOnce(&mut Event) -> Result<(), AppError>,
{
    let mut tx = state.pool.begin().await?;

    let mut event = lock_event_by_slug(&mut tx, slug).await?;
    event.ensure_organized_by(user.id)?;
    apply(&mut event)?;

    let event = sqlx::query_as::<_, Event>(
        "UPDATE events SET status = $1, updated_at = $2 WHERE id = $3 RETURNING *",
    )
    .bind(event.status)
    .bind(Utc::now())
    .bind(event.id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(event = %event.slug, status = event.status.as_str(), "Event status changed");

    Ok(event)
}

/// Slug uniqueness: append a counter to the base slug until free.
async fn unique_slug(state: &AppState, title: &str) -> Result<String, AppError> {
    let base = slugify(title);
    let mut candidate = base.clone();
    let mut counter = 1;

    loop {
        let taken: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM events WHERE slug = $1)")
            .bind(&candidate)
            .fetch_one(&state.pool)
            .await?;

        if !taken {
            return Ok(candidate);
        }

        candidate = format!("{}-{}", base, counter);
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_event() -> Event {
        let now = Utc::now();
        Event {
            id: Uuid::new_v4(),
            organizer_id: Uuid::new_v4(),
            title: "Rust Meetup".to_string(),
            slug: "rust-meetup".to_string(),
            description: None,
            venue: "Town Hall".to_string(),
            city: "Lagos".to_string(),
            start_time: now + Duration::days(7),
            end_time: now + Duration::days(7) + Duration::hours(3),
            status: EventStatus::Published,
            total_seats: 10,
            available_seats: 10,
            ticket_price: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        }
    }

    fn empty_update() -> UpdateEventRequest {
        UpdateEventRequest {
            title: None,
            description: None,
            venue: None,
            city: None,
            start_time: None,
            end_time: None,
            total_seats: None,
            ticket_price: None,
        }
    }

    #[test]
    fn test_apply_event_update_reports_attendee_facing_changes() {
        let mut event = sample_event();
        let new_start = event.start_time + Duration::days(1);

        let req = UpdateEventRequest {
            venue: Some("Convention Centre".to_string()),
            start_time: Some(new_start),
            end_time: Some(new_start + Duration::hours(3)),
            ticket_price: Some(Decimal::new(1500, 2)),
            ..empty_update()
        };
        let changes = apply_event_update(&mut event, &req).unwrap();

        assert_eq!(changes.len(), 3);
        assert!(changes.iter().any(|c| c.contains("Venue")));
        assert!(changes.iter().any(|c| c.contains("Date/time")));
        assert!(changes.iter().any(|c| c.contains("Price")));
        assert_eq!(event.venue, "Convention Centre");
        assert_eq!(event.start_time, new_start);
        assert_eq!(event.ticket_price, Decimal::new(1500, 2));
    }

    #[test]
    fn test_apply_event_update_no_changes_for_cosmetic_edits() {
        let mut event = sample_event();

        // Title and description edits never ping attendees
        let req = UpdateEventRequest {
            title: Some("Rust Meetup (rescheduled talks)".to_string()),
            description: Some("New lineup".to_string()),
            ..empty_update()
        };
        let changes = apply_event_update(&mut event, &req).unwrap();
        assert!(changes.is_empty());

        // Re-submitting the current venue is not a change either
        let req = UpdateEventRequest {
            venue: Some(event.venue.clone()),
            ..empty_update()
        };
        let changes = apply_event_update(&mut event, &req).unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn test_apply_event_update_resizes_seating() {
        let mut event = sample_event();
        event.reserve_seats(4).unwrap();

        let req = UpdateEventRequest {
            total_seats: Some(20),
            ..empty_update()
        };
        apply_event_update(&mut event, &req).unwrap();
        assert_eq!(event.total_seats, 20);
        assert_eq!(event.available_seats, 16);

        let req = UpdateEventRequest {
            total_seats: Some(3),
            ..empty_update()
        };
        assert!(matches!(
            apply_event_update(&mut event, &req),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_apply_event_update_rejects_inverted_times() {
        let mut event = sample_event();
        let req = UpdateEventRequest {
            end_time: Some(event.start_time - Duration::hours(1)),
            ..empty_update()
        };
        assert!(matches!(
            apply_event_update(&mut event, &req),
            Err(AppError::ValidationError(_))
        ));
    }

    #[derive(Debug)]
    struct DuplicateSlugError {
        constraint: &'static str,
    }

    impl std::fmt::Display for DuplicateSlugError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "duplicate key value violates unique constraint")
        }
    }

    impl std::error::Error for DuplicateSlugError {}

    impl sqlx::error::DatabaseError for DuplicateSlugError {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            sqlx::error::ErrorKind::UniqueViolation
        }

        fn constraint(&self) -> Option<&str> {
            Some(self.constraint)
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }
    }

    #[test]
    fn test_slug_conflict_detection() {
        let err = sqlx::Error::Database(Box::new(DuplicateSlugError {
            constraint: "events_slug_key",
        }));
        assert!(is_slug_conflict(&err));

        // Other unique violations surface as-is
        let err = sqlx::Error::Database(Box::new(DuplicateSlugError {
            constraint: "one_registration_per_user",
        }));
        assert!(!is_slug_conflict(&err));

        assert!(!is_slug_conflict(&sqlx::Error::RowNotFound));
    }

    fn organizer_row(status: EventStatus, registrations: i64) -> OrganizerEventRow {
        let mut event = sample_event();
        event.status = status;
        OrganizerEventRow {
            event,
            registration_count: registrations,
        }
    }

    #[test]
    fn test_summarize_my_events_counts_whole_portfolio() {
        let rows = vec![
            organizer_row(EventStatus::Published, 5),
            organizer_row(EventStatus::Published, 0),
            organizer_row(EventStatus::Draft, 0),
            organizer_row(EventStatus::Cancelled, 2),
        ];

        let payload = summarize_my_events(rows, None);
        assert_eq!(payload.total_events, 4);
        assert_eq!(payload.published_events, 2);
        assert_eq!(payload.draft_events, 1);
    }

    #[test]
    fn test_summarize_my_events_status_filter_keeps_portfolio_tallies() {
        let rows = vec![
            organizer_row(EventStatus::Published, 5),
            organizer_row(EventStatus::Draft, 0),
            organizer_row(EventStatus::Draft, 0),
        ];

        let payload = summarize_my_events(rows, Some(EventStatus::Draft));
        assert_eq!(payload.events.len(), 2);
        assert_eq!(payload.total_events, 2);
        // Tallies still describe everything the organizer runs
        assert_eq!(payload.published_events, 1);
        assert_eq!(payload.draft_events, 2);
    }

    fn row(status: RegistrationStatus, tickets: i32) -> AttendeeRow {
        AttendeeRow {
            registration_id: Uuid::new_v4(),
            attendee_name: "Ada".to_string(),
            attendee_email: "ada@example.com".to_string(),
            status,
            number_of_tickets: tickets,
            ticket_number: "TKT-0011223344AA".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_attendee_stats_counts_by_status() {
        let rows = vec![
            row(RegistrationStatus::Confirmed, 2),
            row(RegistrationStatus::Confirmed, 1),
            row(RegistrationStatus::Attended, 3),
            row(RegistrationStatus::Pending, 1),
        ];
        let stats = attendee_stats(&rows, Decimal::ZERO);

        assert_eq!(stats.total_attendees, 4);
        assert_eq!(stats.total_tickets, 7);
        assert_eq!(stats.confirmed_count, 2);
        assert_eq!(stats.attended_count, 1);
        assert_eq!(stats.pending_count, 1);
    }

    #[test]
    fn test_attendee_stats_revenue_is_price_times_tickets() {
        let rows = vec![
            row(RegistrationStatus::Confirmed, 2),
            row(RegistrationStatus::Attended, 3),
        ];
        let stats = attendee_stats(&rows, Decimal::new(2500, 2)); // 25.00

        assert_eq!(stats.total_revenue, Decimal::new(12500, 2)); // 125.00
    }

    #[test]
    fn test_attendee_stats_empty() {
        let stats = attendee_stats(&[], Decimal::new(1000, 2));
        assert_eq!(stats.total_attendees, 0);
        assert_eq!(stats.total_revenue, Decimal::ZERO);
    }
}
