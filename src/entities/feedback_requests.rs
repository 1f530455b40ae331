use sea_orm::entity::prelude::*;

use crate::domain::RequestStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "feedback_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub candidate_email: String,
    pub candidate_name: Option<String>,
    pub candidate_name_folded: Option<String>,
    pub form_id: i32,
    pub reviewer_id: i32,
    #[sea_orm(unique)]
    pub token: String,
    pub status: RequestStatus,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::forms::Entity",
        from = "Column::FormId",
        to = "super::forms::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Form,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ReviewerId",
        to = "super::users::Column::Id"
    )]
    Reviewer,
    #[sea_orm(has_one = "super::feedbacks::Entity")]
    Feedback,
}

impl Related<super::forms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Form.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviewer.def()
    }
}

impl Related<super::feedbacks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Feedback.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
