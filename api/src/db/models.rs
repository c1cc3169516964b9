use serde::Serialize;

/// SQLite では TEXT として格納されるため String、
/// PostgreSQL では TIMESTAMPTZ として格納されるため chrono 型を使用。
#[cfg(not(feature = "postgres"))]
pub type Timestamp = String;
#[cfg(feature = "postgres")]
pub type Timestamp = chrono::DateTime<chrono::Utc>;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct UserRow {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub profile_picture_url: Option<String>,
    pub role: String,
    /// preferencesのJSONシリアライズ表現（未設定ならNULL）
    pub preferences: Option<String>,
    pub date_joined: Timestamp,
    pub last_active_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SubscriptionRow {
    pub id: String,
    pub user_id: String,
    pub plan: String,
    pub start_date: Timestamp,
    pub end_date: Option<Timestamp>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PaymentRow {
    pub id: String,
    pub user_id: String,
    pub subscription_id: String,
    pub amount: i64,
    pub payment_method: String,
    pub status: String,
    pub transaction_id: Option<String>,
    pub paid_at: Timestamp,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct EnrollmentRow {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub progress: i32,
    pub is_completed: bool,
    pub enrolled_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub certificate_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct InstructorRow {
    pub id: String,
    pub user_id: String,
    pub specialization: Option<String>,
    pub bio: Option<String>,
    pub is_available: bool,
    pub online_status: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ConversationRow {
    pub id: String,
    pub course_id: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ParticipantRow {
    pub id: String,
    pub conversation_id: String,
    pub user_id: String,
    pub role: String,
    pub last_read_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MessageRow {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    pub message_type: String,
    pub content: Option<String>,
    pub file_url: Option<String>,
    pub audio_url: Option<String>,
    pub is_read: bool,
    pub sent_at: Timestamp,
}
