use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "feedbacks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub feedback_request_id: i32,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::feedback_requests::Entity",
        from = "Column::FeedbackRequestId",
        to = "super::feedback_requests::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    FeedbackRequest,
    #[sea_orm(has_many = "super::answers::Entity")]
    Answers,
}

impl Related<super::feedback_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeedbackRequest.def()
    }
}

impl Related<super::answers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Answers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
