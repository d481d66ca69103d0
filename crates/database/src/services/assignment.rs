use crate::entities::course_assignment;
use sea_orm::{ActiveValue::Set, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};
use std::collections::HashSet;

/// The insertions and deletions needed to make a course's persisted
/// instructor set equal the selection submitted by the form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssignmentDiff {
    pub to_add: Vec<i32>,
    pub to_remove: Vec<i32>,
}

impl AssignmentDiff {
    /// Compares the submitted instructor selection against the currently
    /// assigned ids. `desired = None` means nothing was selected, so every
    /// current assignment is removed. Instructors in both sets or in
    /// neither are left untouched. Output is sorted so the generated SQL
    /// is deterministic.
    pub fn compute(desired: Option<&[i32]>, current: &HashSet<i32>) -> Self {
        let desired: HashSet<i32> = desired
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default();

        let mut to_add: Vec<i32> = desired.difference(current).copied().collect();
        let mut to_remove: Vec<i32> = current.difference(&desired).copied().collect();
        to_add.sort_unstable();
        to_remove.sort_unstable();

        AssignmentDiff { to_add, to_remove }
    }

    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

pub struct AssignmentService;

impl AssignmentService {
    /// Applies a diff against the caller's connection, normally an open
    /// transaction. One bulk insert and one bulk delete at most; commit and
    /// rollback stay with the caller.
    pub async fn reconcile<C: ConnectionTrait>(
        conn: &C,
        course_id: i32,
        diff: &AssignmentDiff,
    ) -> Result<(), DbErr> {
        if !diff.to_add.is_empty() {
            let assignments = diff.to_add.iter().map(|&instructor_id| {
                course_assignment::ActiveModel {
                    course_id: Set(course_id),
                    instructor_id: Set(instructor_id),
                }
            });

            course_assignment::Entity::insert_many(assignments)
                .exec_without_returning(conn)
                .await?;
        }

        if !diff.to_remove.is_empty() {
            course_assignment::Entity::delete_many()
                .filter(course_assignment::Column::CourseId.eq(course_id))
                .filter(course_assignment::Column::InstructorId.is_in(diff.to_remove.clone()))
                .exec(conn)
                .await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn ids(ids: &[i32]) -> HashSet<i32> {
        ids.iter().copied().collect()
    }

    #[test]
    fn no_selection_removes_everything() {
        let diff = AssignmentDiff::compute(None, &ids(&[4, 7, 9]));

        assert_eq!(diff.to_add, Vec::<i32>::new());
        assert_eq!(diff.to_remove, vec![4, 7, 9]);
    }

    #[test]
    fn no_selection_with_no_assignments_is_empty() {
        let diff = AssignmentDiff::compute(None, &ids(&[]));
        assert!(diff.is_empty());
    }

    #[test]
    fn fresh_selection_only_inserts() {
        let diff = AssignmentDiff::compute(Some(&[1, 2]), &ids(&[]));

        assert_eq!(diff.to_add, vec![1, 2]);
        assert_eq!(diff.to_remove, Vec::<i32>::new());
    }

    #[test]
    fn overlapping_selection_diffs_both_ways() {
        let diff = AssignmentDiff::compute(Some(&[2, 3]), &ids(&[1, 2]));

        assert_eq!(diff.to_add, vec![3]);
        assert_eq!(diff.to_remove, vec![1]);
    }

    #[test]
    fn identical_selection_is_empty() {
        let diff = AssignmentDiff::compute(Some(&[1, 2]), &ids(&[1, 2]));
        assert!(diff.is_empty());
    }

    #[test]
    fn duplicate_selections_collapse() {
        let diff = AssignmentDiff::compute(Some(&[5, 5, 5]), &ids(&[]));
        assert_eq!(diff.to_add, vec![5]);
    }

    #[test]
    fn reconciling_twice_is_idempotent() {
        let desired = [2, 3, 8];
        let first = AssignmentDiff::compute(Some(&desired), &ids(&[1, 2]));

        // Apply the first diff to the current set, then diff again.
        let mut after: HashSet<i32> = ids(&[1, 2]);
        after.extend(&first.to_add);
        for id in &first.to_remove {
            after.remove(id);
        }
        assert_eq!(after, ids(&desired));

        let second = AssignmentDiff::compute(Some(&desired), &after);
        assert!(second.is_empty());
    }

    #[tokio::test]
    async fn empty_diff_issues_no_statements() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        AssignmentService::reconcile(&db, 1050, &AssignmentDiff::default())
            .await
            .unwrap();

        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn mixed_diff_issues_one_insert_and_one_delete() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 2,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
            ])
            .into_connection();

        let diff = AssignmentDiff {
            to_add: vec![3, 4],
            to_remove: vec![1],
        };
        AssignmentService::reconcile(&db, 1050, &diff).await.unwrap();

        assert_eq!(db.into_transaction_log().len(), 2);
    }
}
