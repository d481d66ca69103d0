use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "instructors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub last_name: String,
    pub first_name: String,
    pub hire_date: Date,
}

impl Model {
    /// Display name used in dropdowns and course details
    pub fn full_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::course_assignment::Entity")]
    CourseAssignments,
    #[sea_orm(has_one = "super::office_assignment::Entity")]
    OfficeAssignment,
}

impl Related<super::course_assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CourseAssignments.def()
    }
}

impl Related<super::office_assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OfficeAssignment.def()
    }
}

// Many-to-many relationship with courses
impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        super::course_assignment::Relation::Course.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::course_assignment::Relation::Instructor.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_is_last_comma_first() {
        let instructor = Model {
            id: 1,
            last_name: "Abercrombie".to_string(),
            first_name: "Kim".to_string(),
            hire_date: Date::from_ymd_opt(1995, 3, 11).unwrap(),
        };

        assert_eq!(instructor.full_name(), "Abercrombie, Kim");
    }
}
