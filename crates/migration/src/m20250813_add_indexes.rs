use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Index on courses.department_id for the list view join
        manager
            .create_index(
                Index::create()
                    .name("idx_courses_department_id")
                    .table(Courses::Table)
                    .col(Courses::DepartmentId)
                    .to_owned(),
            )
            .await?;

        // Indexes on enrollments for faster joins
        manager
            .create_index(
                Index::create()
                    .name("idx_enrollments_course_id")
                    .table(Enrollments::Table)
                    .col(Enrollments::CourseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_enrollments_student_id")
                    .table(Enrollments::Table)
                    .col(Enrollments::StudentId)
                    .to_owned(),
            )
            .await?;

        // Index on course_assignments.instructor_id; the composite primary
        // key already covers lookups by course
        manager
            .create_index(
                Index::create()
                    .name("idx_course_assignments_instructor_id")
                    .table(CourseAssignments::Table)
                    .col(CourseAssignments::InstructorId)
                    .to_owned(),
            )
            .await?;

        // Index on students.enrollment_date for the About report grouping
        manager
            .create_index(
                Index::create()
                    .name("idx_students_enrollment_date")
                    .table(Students::Table)
                    .col(Students::EnrollmentDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_courses_department_id")
                    .table(Courses::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_enrollments_course_id")
                    .table(Enrollments::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_enrollments_student_id")
                    .table(Enrollments::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_course_assignments_instructor_id")
                    .table(CourseAssignments::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_students_enrollment_date")
                    .table(Students::Table)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Courses {
    Table,
    DepartmentId,
}

#[derive(Iden)]
enum Students {
    Table,
    EnrollmentDate,
}

#[derive(Iden)]
enum Enrollments {
    Table,
    CourseId,
    StudentId,
}

#[derive(Iden)]
enum CourseAssignments {
    Table,
    InstructorId,
}
