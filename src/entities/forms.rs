use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "forms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub title_folded: String,
    pub created_by_id: i32,
    pub created_at: String,
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
    #[sea_orm(has_many = "super::feedback_requests::Entity")]
    FeedbackRequests,
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

impl Related<super::feedback_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeedbackRequests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
