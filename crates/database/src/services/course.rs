use crate::entities::{course, course_assignment, department, enrollment, instructor,
    office_assignment};
use crate::services::assignment::{AssignmentDiff, AssignmentService};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use std::collections::{HashMap, HashSet};

/// A validated course form, ready to persist. `instructor_ids = None` means
/// the multi-select came back with nothing chosen.
#[derive(Clone, Debug)]
pub struct CourseInput {
    pub id: i32,
    pub title: String,
    pub credits: i32,
    pub department_id: i32,
    pub instructor_ids: Option<Vec<i32>>,
}

#[derive(Debug)]
pub enum CourseSaveError {
    CourseNotFound,
    UnknownInstructor,
    Db(DbErr),
}

impl From<DbErr> for CourseSaveError {
    fn from(err: DbErr) -> Self {
        CourseSaveError::Db(err)
    }
}

/// A course with everything its details page shows
#[derive(Clone, Debug)]
pub struct CourseDetails {
    pub course: course::Model,
    pub department: Option<department::Model>,
    pub instructors: Vec<(instructor::Model, Option<office_assignment::Model>)>,
    pub enrollment_count: u64,
}

pub struct CourseService;

impl CourseService {
    /// Get all courses with their department, ordered by course number
    pub async fn list_courses(
        db: &DatabaseConnection,
    ) -> Result<Vec<(course::Model, Option<department::Model>)>, DbErr> {
        course::Entity::find()
            .find_also_related(department::Entity)
            .order_by_asc(course::Column::Id)
            .all(db)
            .await
    }

    /// Get a single course with its department, assigned instructors (and
    /// their offices), and enrollment count
    pub async fn get_course_details(
        db: &DatabaseConnection,
        course_id: i32,
    ) -> Result<Option<CourseDetails>, DbErr> {
        let (course, dept) = match course::Entity::find_by_id(course_id)
            .find_also_related(department::Entity)
            .one(db)
            .await?
        {
            Some(pair) => pair,
            None => return Ok(None),
        };

        // Fetch the assigned instructors through the junction table
        let mut instructors: Vec<instructor::Model> = course_assignment::Entity::find()
            .filter(course_assignment::Column::CourseId.eq(course_id))
            .find_also_related(instructor::Entity)
            .all(db)
            .await?
            .into_iter()
            .filter_map(|(_, instructor)| instructor)
            .collect();
        instructors.sort_by(|a, b| a.last_name.cmp(&b.last_name));

        let instructor_ids: Vec<i32> = instructors.iter().map(|i| i.id).collect();

        let mut offices: HashMap<i32, office_assignment::Model> = office_assignment::Entity::find()
            .filter(office_assignment::Column::InstructorId.is_in(instructor_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|office| (office.instructor_id, office))
            .collect();

        let instructors = instructors
            .into_iter()
            .map(|instructor| {
                let office = offices.remove(&instructor.id);
                (instructor, office)
            })
            .collect();

        let enrollment_count = enrollment::Entity::find()
            .filter(enrollment::Column::CourseId.eq(course_id))
            .count(db)
            .await?;

        Ok(Some(CourseDetails {
            course,
            department: dept,
            instructors,
            enrollment_count,
        }))
    }

    /// Create a course with its caller-supplied number and initial instructor
    /// selection, all in one transaction
    pub async fn create_course(
        db: &DatabaseConnection,
        input: CourseInput,
    ) -> Result<course::Model, CourseSaveError> {
        let txn = db.begin().await?;

        if let Some(ids) = &input.instructor_ids {
            Self::ensure_instructors_exist(&txn, ids).await?;
        }

        let course = course::Model {
            id: input.id,
            title: input.title,
            credits: input.credits,
            department_id: input.department_id,
        };
        let new_course = course::ActiveModel {
            id: Set(course.id),
            title: Set(course.title.clone()),
            credits: Set(course.credits),
            department_id: Set(course.department_id),
        };
        course::Entity::insert(new_course).exec(&txn).await?;

        // Against an empty current set the diff is pure insertions
        let diff = AssignmentDiff::compute(input.instructor_ids.as_deref(), &HashSet::new());
        AssignmentService::reconcile(&txn, input.id, &diff).await?;

        txn.commit().await?;

        log::debug!("created course {}", course.id);
        Ok(course)
    }

    /// Edit a course and reconcile its instructor assignments. Loads the
    /// course and its current assignments inside the transaction, applies the
    /// field updates, then queues the assignment insertions/deletions the
    /// submitted selection requires. Everything commits atomically; any
    /// failure rolls the whole edit back.
    pub async fn update_course(
        db: &DatabaseConnection,
        input: CourseInput,
    ) -> Result<course::Model, CourseSaveError> {
        let txn = db.begin().await?;

        let course = course::Entity::find_by_id(input.id)
            .one(&txn)
            .await?
            .ok_or(CourseSaveError::CourseNotFound)?;

        if let Some(ids) = &input.instructor_ids {
            Self::ensure_instructors_exist(&txn, ids).await?;
        }

        let current: HashSet<i32> = course_assignment::Entity::find()
            .filter(course_assignment::Column::CourseId.eq(input.id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|assignment| assignment.instructor_id)
            .collect();

        let mut course: course::ActiveModel = course.into();
        course.title = Set(input.title);
        course.credits = Set(input.credits);
        course.department_id = Set(input.department_id);
        let updated = course.update(&txn).await?;

        let diff = AssignmentDiff::compute(input.instructor_ids.as_deref(), &current);
        log::debug!(
            "course {}: {} assignment(s) to add, {} to remove",
            input.id,
            diff.to_add.len(),
            diff.to_remove.len()
        );
        AssignmentService::reconcile(&txn, input.id, &diff).await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Delete a course; enrollments and assignments cascade. Returns false
    /// when no course had the given id.
    pub async fn delete_course(db: &DatabaseConnection, course_id: i32) -> Result<bool, DbErr> {
        let course = match course::Entity::find_by_id(course_id).one(db).await? {
            Some(course) => course,
            None => return Ok(false),
        };

        course.delete(db).await?;
        Ok(true)
    }

    /// The optimized diff no longer walks the full instructor table, so ids
    /// with no matching instructor must be rejected up front instead of
    /// being silently skipped.
    async fn ensure_instructors_exist<C: ConnectionTrait>(
        conn: &C,
        ids: &[i32],
    ) -> Result<(), CourseSaveError> {
        let unique: HashSet<i32> = ids.iter().copied().collect();
        if unique.is_empty() {
            return Ok(());
        }

        let found = instructor::Entity::find()
            .filter(instructor::Column::Id.is_in(unique.clone()))
            .count(conn)
            .await?;

        if found != unique.len() as u64 {
            return Err(CourseSaveError::UnknownInstructor);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use std::collections::BTreeMap;

    fn chemistry() -> course::Model {
        course::Model {
            id: 1050,
            title: "Chemistry".to_string(),
            credits: 3,
            department_id: 3,
        }
    }

    #[tokio::test]
    async fn failed_assignment_insert_rolls_back_the_whole_edit() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // course lookup
            .append_query_results([vec![chemistry()]])
            // instructor existence check
            .append_query_results([vec![BTreeMap::from([(
                "num_items",
                Value::BigInt(Some(1)),
            )])]])
            // current assignments
            .append_query_results([vec![course_assignment::Model {
                course_id: 1050,
                instructor_id: 1,
            }]])
            // field update, returned row
            .append_query_results([vec![chemistry()]])
            // the queued junction insert fails
            .append_exec_errors([DbErr::Custom("duplicate key".to_string())])
            .into_connection();

        let input = CourseInput {
            id: 1050,
            title: "Chemistry".to_string(),
            credits: 3,
            department_id: 3,
            instructor_ids: Some(vec![2]),
        };

        let result = CourseService::update_course(&db, input).await;
        assert!(matches!(result, Err(CourseSaveError::Db(_))));

        // The field update and both assignment mutations share one
        // transaction; when any of them fails, nothing commits
        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("ROLLBACK"));
        assert!(!log.contains("COMMIT"));
    }

    #[tokio::test]
    async fn editing_a_missing_course_queues_no_mutations() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<course::Model>::new()])
            .into_connection();

        let input = CourseInput {
            id: 4041,
            title: "Macroeconomics".to_string(),
            credits: 3,
            department_id: 4,
            instructor_ids: None,
        };

        let result = CourseService::update_course(&db, input).await;
        assert!(matches!(result, Err(CourseSaveError::CourseNotFound)));

        let log = format!("{:?}", db.into_transaction_log());
        assert!(!log.contains("INSERT"));
        assert!(!log.contains("UPDATE"));
        assert!(!log.contains("DELETE"));
    }
}
