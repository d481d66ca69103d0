use crate::entities::{department, instructor};
use futures::try_join;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, QueryOrder};

/// One entry of a dropdown list
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectItem {
    pub id: i32,
    pub label: String,
}

pub struct LookupService;

impl LookupService {
    /// Option lists for the course form: departments ordered by name,
    /// instructors ordered by last name
    pub async fn get_course_options(
        db: &DatabaseConnection,
    ) -> Result<(Vec<SelectItem>, Vec<SelectItem>), DbErr> {
        let departments = department::Entity::find().order_by_asc(department::Column::Name);
        let instructors = instructor::Entity::find().order_by_asc(instructor::Column::LastName);

        let (departments, instructors) = try_join!(departments.all(db), instructors.all(db))?;

        let departments = departments
            .into_iter()
            .map(|d| SelectItem {
                id: d.id,
                label: d.name,
            })
            .collect();

        let instructors = instructors
            .into_iter()
            .map(|i| SelectItem {
                id: i.id,
                label: i.full_name(),
            })
            .collect();

        Ok((departments, instructors))
    }
}
