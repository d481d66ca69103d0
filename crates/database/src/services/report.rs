use crate::entities::student;
use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, QuerySelect,
};

pub struct ReportService;

impl ReportService {
    /// Students grouped by the date they enrolled, oldest first; backs the
    /// About page body count table
    pub async fn enrollment_date_groups(
        db: &DatabaseConnection,
    ) -> Result<Vec<(NaiveDate, i64)>, DbErr> {
        student::Entity::find()
            .select_only()
            .column(student::Column::EnrollmentDate)
            .column_as(student::Column::Id.count(), "student_count")
            .group_by(student::Column::EnrollmentDate)
            .order_by_asc(student::Column::EnrollmentDate)
            .into_tuple::<(NaiveDate, i64)>()
            .all(db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use std::collections::BTreeMap;

    fn row(date: NaiveDate, count: i64) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([
            ("enrollment_date", Value::from(date)),
            ("student_count", Value::from(count)),
        ])
    }

    #[tokio::test]
    async fn groups_come_back_as_date_count_pairs() {
        let sept = NaiveDate::from_ymd_opt(2019, 9, 1).unwrap();
        let oct = NaiveDate::from_ymd_opt(2019, 10, 1).unwrap();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row(sept, 3), row(oct, 1)]])
            .into_connection();

        let groups = ReportService::enrollment_date_groups(&db).await.unwrap();

        assert_eq!(groups, vec![(sept, 3), (oct, 1)]);
    }
}
