//! 永続化スキーマの静的な記述。
//!
//! マイグレーションSQLと1対1で対応するテーブル・カラム定義を、
//! 他のレイヤ（フォーム生成、管理画面、ドキュメント）からも参照できる
//! データとして公開する。リフレクションによる導出はせず、明示的に列挙する。

/// カラムの意味的な型。方言ごとの実際のSQL型はマイグレーション側が決める。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Integer,
    BigInt,
    Boolean,
    Timestamp,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub ty: ColumnType,
    pub nullable: bool,
    /// SQL表現でのデフォルト値（なければ呼び出し側が必ず与える）
    pub default: Option<&'static str>,
    pub primary_key: bool,
    pub unique: bool,
}

impl ColumnDef {
    pub const fn new(name: &'static str, ty: ColumnType) -> Self {
        Self {
            name,
            ty,
            nullable: false,
            default: None,
            primary_key: false,
            unique: false,
        }
    }

    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub const fn default_sql(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDef {
    pub name: &'static str,
    pub columns: &'static [ColumnDef],
}

impl TableDef {
    pub fn column(&self, name: &str) -> Option<&'static ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// UNIQUE制約を持つカラム名の一覧（主キーは含まない）
    pub fn unique_columns(&self) -> impl Iterator<Item = &'static str> {
        self.columns
            .iter()
            .filter(|c| c.unique && !c.primary_key)
            .map(|c| c.name)
    }
}

use ColumnType::*;

const fn id_column() -> ColumnDef {
    ColumnDef::new("id", Text).primary_key()
}

pub const USERS: TableDef = TableDef {
    name: "users",
    columns: &[
        id_column(),
        ColumnDef::new("username", Text).unique(),
        ColumnDef::new("password_hash", Text),
        ColumnDef::new("email", Text).unique(),
        ColumnDef::new("full_name", Text),
        ColumnDef::new("phone", Text).nullable(),
        ColumnDef::new("profile_picture_url", Text).nullable(),
        ColumnDef::new("role", Text).default_sql("'student'"),
        ColumnDef::new("preferences", Json).nullable(),
        ColumnDef::new("date_joined", Timestamp).default_sql("CURRENT_TIMESTAMP"),
        ColumnDef::new("last_active_at", Timestamp).nullable(),
    ],
};

pub const SUBSCRIPTIONS: TableDef = TableDef {
    name: "subscriptions",
    columns: &[
        id_column(),
        ColumnDef::new("user_id", Text),
        ColumnDef::new("plan", Text).default_sql("'free'"),
        ColumnDef::new("start_date", Timestamp).default_sql("CURRENT_TIMESTAMP"),
        ColumnDef::new("end_date", Timestamp).nullable(),
        ColumnDef::new("is_active", Boolean).default_sql("TRUE"),
    ],
};

pub const PAYMENT_HISTORY: TableDef = TableDef {
    name: "payment_history",
    columns: &[
        id_column(),
        ColumnDef::new("user_id", Text),
        ColumnDef::new("subscription_id", Text),
        ColumnDef::new("amount", BigInt),
        ColumnDef::new("payment_method", Text),
        ColumnDef::new("status", Text),
        ColumnDef::new("transaction_id", Text).nullable().unique(),
        ColumnDef::new("paid_at", Timestamp).default_sql("CURRENT_TIMESTAMP"),
    ],
};

pub const ENROLLMENTS: TableDef = TableDef {
    name: "enrollments",
    columns: &[
        id_column(),
        ColumnDef::new("user_id", Text),
        ColumnDef::new("course_id", Text),
        ColumnDef::new("progress", Integer).default_sql("0"),
        ColumnDef::new("is_completed", Boolean).default_sql("FALSE"),
        ColumnDef::new("enrolled_at", Timestamp).default_sql("CURRENT_TIMESTAMP"),
        ColumnDef::new("completed_at", Timestamp).nullable(),
        ColumnDef::new("certificate_id", Text).nullable(),
    ],
};

pub const INSTRUCTORS: TableDef = TableDef {
    name: "instructors",
    columns: &[
        id_column(),
        ColumnDef::new("user_id", Text).unique(),
        ColumnDef::new("specialization", Text).nullable(),
        ColumnDef::new("bio", Text).nullable(),
        ColumnDef::new("is_available", Boolean).default_sql("TRUE"),
        ColumnDef::new("online_status", Text).default_sql("'offline'"),
    ],
};

pub const CONVERSATIONS: TableDef = TableDef {
    name: "conversations",
    columns: &[
        id_column(),
        ColumnDef::new("course_id", Text),
        ColumnDef::new("created_at", Timestamp).default_sql("CURRENT_TIMESTAMP"),
        ColumnDef::new("updated_at", Timestamp).default_sql("CURRENT_TIMESTAMP"),
    ],
};

pub const CONVERSATION_PARTICIPANTS: TableDef = TableDef {
    name: "conversation_participants",
    columns: &[
        id_column(),
        ColumnDef::new("conversation_id", Text),
        ColumnDef::new("user_id", Text),
        ColumnDef::new("role", Text).default_sql("'student'"),
        ColumnDef::new("last_read_at", Timestamp).nullable(),
    ],
};

pub const MESSAGES: TableDef = TableDef {
    name: "messages",
    columns: &[
        id_column(),
        ColumnDef::new("conversation_id", Text),
        ColumnDef::new("sender_id", Text),
        ColumnDef::new("message_type", Text).default_sql("'text'"),
        ColumnDef::new("content", Text).nullable(),
        ColumnDef::new("file_url", Text).nullable(),
        ColumnDef::new("audio_url", Text).nullable(),
        ColumnDef::new("is_read", Boolean).default_sql("FALSE"),
        ColumnDef::new("sent_at", Timestamp).default_sql("CURRENT_TIMESTAMP"),
    ],
};

pub const TABLES: &[TableDef] = &[
    USERS,
    SUBSCRIPTIONS,
    PAYMENT_HISTORY,
    ENROLLMENTS,
    INSTRUCTORS,
    CONVERSATIONS,
    CONVERSATION_PARTICIPANTS,
    MESSAGES,
];

pub fn table(name: &str) -> Option<&'static TableDef> {
    TABLES.iter().find(|t| t.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_table_has_a_single_text_primary_key() {
        for t in TABLES {
            let pks: Vec<_> = t.columns.iter().filter(|c| c.primary_key).collect();
            assert_eq!(pks.len(), 1, "table {}", t.name);
            assert_eq!(pks[0].name, "id", "table {}", t.name);
            assert_eq!(pks[0].ty, ColumnType::Text, "table {}", t.name);
        }
    }

    #[test]
    fn uniqueness_set_is_exactly_as_declared() {
        let mut unique: Vec<(&str, &str)> = TABLES
            .iter()
            .flat_map(|t| t.unique_columns().map(move |c| (t.name, c)))
            .collect();
        unique.sort_unstable();
        assert_eq!(
            unique,
            vec![
                ("instructors", "user_id"),
                ("payment_history", "transaction_id"),
                ("users", "email"),
                ("users", "username"),
            ]
        );
    }

    #[test]
    fn column_names_are_distinct_within_each_table() {
        for t in TABLES {
            for (i, c) in t.columns.iter().enumerate() {
                assert!(
                    !t.columns[i + 1..].iter().any(|o| o.name == c.name),
                    "duplicate column {} in table {}",
                    c.name,
                    t.name
                );
            }
        }
    }

    #[test]
    fn declared_defaults_match_the_validation_defaults() {
        assert_eq!(USERS.column("role").unwrap().default, Some("'student'"));
        assert_eq!(SUBSCRIPTIONS.column("plan").unwrap().default, Some("'free'"));
        assert_eq!(MESSAGES.column("message_type").unwrap().default, Some("'text'"));
        assert_eq!(ENROLLMENTS.column("progress").unwrap().default, Some("0"));
        assert_eq!(MESSAGES.column("is_read").unwrap().default, Some("FALSE"));
        assert_eq!(SUBSCRIPTIONS.column("is_active").unwrap().default, Some("TRUE"));
        // 決済ステータスにデフォルトはない（呼び出し側が必ず与える）
        assert_eq!(PAYMENT_HISTORY.column("status").unwrap().default, None);
    }

    #[test]
    fn lookup_by_name() {
        assert!(table("payment_history").is_some());
        assert!(table("sessions").is_none());
    }
}
