use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    #[allow(clippy::too_many_lines)]
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::CreatedAt).string().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Questions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Questions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Questions::Text).text().not_null())
                    .col(ColumnDef::new(Questions::TextFolded).text().not_null())
                    .col(ColumnDef::new(Questions::QuestionType).string().not_null())
                    .col(ColumnDef::new(Questions::Options).json().null())
                    .col(ColumnDef::new(Questions::CreatedById).integer().not_null())
                    .col(ColumnDef::new(Questions::CreatedAt).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_questions_created_by_id")
                            .from(Questions::Table, Questions::CreatedById)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Forms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Forms::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Forms::Title).string().not_null())
                    .col(ColumnDef::new(Forms::TitleFolded).string().not_null())
                    .col(ColumnDef::new(Forms::CreatedById).integer().not_null())
                    .col(ColumnDef::new(Forms::CreatedAt).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_forms_created_by_id")
                            .from(Forms::Table, Forms::CreatedById)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FormQuestions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FormQuestions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FormQuestions::FormId).integer().not_null())
                    .col(ColumnDef::new(FormQuestions::QuestionId).integer().not_null())
                    .col(
                        ColumnDef::new(FormQuestions::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_form_questions_form_id")
                            .from(FormQuestions::Table, FormQuestions::FormId)
                            .to(Forms::Table, Forms::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_form_questions_question_id")
                            .from(FormQuestions::Table, FormQuestions::QuestionId)
                            .to(Questions::Table, Questions::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Positions are shifted row by row inside a transaction, so only the
        // pair is unique; density is kept by the repository.
        manager
            .create_index(
                Index::create()
                    .name("idx_form_questions_form_question")
                    .table(FormQuestions::Table)
                    .col(FormQuestions::FormId)
                    .col(FormQuestions::QuestionId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_form_questions_form_position")
                    .table(FormQuestions::Table)
                    .col(FormQuestions::FormId)
                    .col(FormQuestions::Position)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FeedbackRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FeedbackRequests::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FeedbackRequests::CandidateEmail)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FeedbackRequests::CandidateName).string().null())
                    .col(
                        ColumnDef::new(FeedbackRequests::CandidateNameFolded)
                            .string()
                            .null(),
                    )
                    .col(ColumnDef::new(FeedbackRequests::FormId).integer().not_null())
                    .col(
                        ColumnDef::new(FeedbackRequests::ReviewerId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FeedbackRequests::Token)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(FeedbackRequests::Status)
                            .string()
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(ColumnDef::new(FeedbackRequests::CreatedAt).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feedback_requests_form_id")
                            .from(FeedbackRequests::Table, FeedbackRequests::FormId)
                            .to(Forms::Table, Forms::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feedback_requests_reviewer_id")
                            .from(FeedbackRequests::Table, FeedbackRequests::ReviewerId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_feedback_requests_reviewer")
                    .table(FeedbackRequests::Table)
                    .col(FeedbackRequests::ReviewerId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Feedbacks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Feedbacks::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Feedbacks::FeedbackRequestId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Feedbacks::CreatedAt).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feedbacks_feedback_request_id")
                            .from(Feedbacks::Table, Feedbacks::FeedbackRequestId)
                            .to(FeedbackRequests::Table, FeedbackRequests::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Answers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Answers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Answers::FeedbackId).integer().not_null())
                    .col(ColumnDef::new(Answers::QuestionId).integer().not_null())
                    .col(ColumnDef::new(Answers::Text).text().null())
                    .col(ColumnDef::new(Answers::Rating).double().null())
                    .col(ColumnDef::new(Answers::Selected).json().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_answers_feedback_id")
                            .from(Answers::Table, Answers::FeedbackId)
                            .to(Feedbacks::Table, Feedbacks::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_answers_question_id")
                            .from(Answers::Table, Answers::QuestionId)
                            .to(Questions::Table, Questions::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Answers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Feedbacks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FeedbackRequests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FormQuestions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Forms::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Questions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    PasswordHash,
    Role,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Questions {
    Table,
    Id,
    Text,
    TextFolded,
    QuestionType,
    Options,
    CreatedById,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Forms {
    Table,
    Id,
    Title,
    TitleFolded,
    CreatedById,
    CreatedAt,
}

#[derive(DeriveIden)]
enum FormQuestions {
    Table,
    Id,
    FormId,
    QuestionId,
    Position,
}

#[derive(DeriveIden)]
enum FeedbackRequests {
    Table,
    Id,
    CandidateEmail,
    CandidateName,
    CandidateNameFolded,
    FormId,
    ReviewerId,
    Token,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Feedbacks {
    Table,
    Id,
    FeedbackRequestId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Answers {
    Table,
    Id,
    FeedbackId,
    QuestionId,
    Text,
    Rating,
    Selected,
}
