/// Declares a fieldless enum that is stored as lowercase text in SQLite and
/// serialized with the same spelling over JSON.
macro_rules! sql_text_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash,
            serde::Serialize, serde::Deserialize,
            diesel::AsExpression, diesel::FromSqlRow,
        )]
        #[diesel(sql_type = diesel::sql_types::Text)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(format!("unknown {} `{}`", stringify!($name), other)),
                }
            }
        }

        impl diesel::serialize::ToSql<diesel::sql_types::Text, diesel::sqlite::Sqlite> for $name {
            fn to_sql<'b>(
                &'b self,
                out: &mut diesel::serialize::Output<'b, '_, diesel::sqlite::Sqlite>,
            ) -> diesel::serialize::Result {
                out.set_value(self.as_str());
                Ok(diesel::serialize::IsNull::No)
            }
        }

        impl diesel::deserialize::FromSql<diesel::sql_types::Text, diesel::sqlite::Sqlite>
            for $name
        {
            fn from_sql(
                bytes: <diesel::sqlite::Sqlite as diesel::backend::Backend>::RawValue<'_>,
            ) -> diesel::deserialize::Result<Self> {
                let text = <String as diesel::deserialize::FromSql<
                    diesel::sql_types::Text,
                    diesel::sqlite::Sqlite,
                >>::from_sql(bytes)?;
                text.parse().map_err(Into::into)
            }
        }
    };
}

pub mod activity_models;
pub mod auth_models;
pub mod progress_models;
pub mod sentence_models;
pub mod simulation_models;
pub mod unseen_models;
pub mod user_models;
pub mod word_models;

pub use activity_models::{
    MistakeRequest, MistakenWord, NewMistake, TimeSpentRequest, TimeSpentRow, TimeSpentToday,
};
pub use auth_models::{LoginForm, RegisterForm};
pub use progress_models::{
    AttemptInput, AttemptRecord, AttemptRow, DailyPractice, NewAttempt, Outcome, OwnerQuery,
    ProgressStats, ProgressStatus, RecordAttemptRequest, Subject, SubjectKind,
};
pub use sentence_models::{
    NewSentenceOption, NewSentenceQuestion, NewSentenceRow, SentenceOption, SentenceOptionRow,
    SentencePayload, SentenceQuestion, SentenceQuestionRow,
};
pub use simulation_models::{NewSimulationRun, SimulationRequest, SimulationRun, SimulationRunRow};
pub use unseen_models::{
    AnswerSheet, GradeReport, NewPassageRequest, NewUnseenQuestion, PassageOption, PassageRow,
    PublicPassage, UnseenOptionRow, UnseenPassage, UnseenQuestion, UnseenQuestionRow,
};
pub use user_models::{CurrentUser, NewUser, User};
pub use word_models::{
    Difficulty, NewWord, NewWordRequest, Pagination, ReviewStatus, StatusUpdateRequest, WordItem,
    WordPage, WordPayload, WordQuery,
};
