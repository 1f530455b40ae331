use sea_orm::entity::prelude::*;

use crate::domain::QuestionType;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Text")]
    pub text: String,
    /// `text` lowercased for search; never exposed.
    #[sea_orm(column_type = "Text")]
    pub text_folded: String,
    pub question_type: QuestionType,
    /// JSON array of option labels; only set for multiple choice.
    #[sea_orm(column_type = "Json", nullable)]
    pub options: Option<Json>,
    pub created_by_id: i32,
    pub created_at: String,
}

impl Model {
    /// Option labels in their stored order, or `None` when the column is
    /// absent or not an array of strings.
    #[must_use]
    pub fn option_labels(&self) -> Option<Vec<String>> {
        self.options
            .as_ref()
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatedById",
        to = "super::users::Column::Id"
    )]
    Creator,
    #[sea_orm(has_many = "super::form_questions::Entity")]
    FormQuestions,
    #[sea_orm(has_many = "super::answers::Entity")]
    Answers,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl Related<super::form_questions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FormQuestions.def()
    }
}

impl Related<super::answers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Answers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
