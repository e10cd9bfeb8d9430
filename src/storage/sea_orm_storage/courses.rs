//! 课程与选课存储操作

use super::{SeaOrmStorage, now_millis};
use crate::entity::course_students::{
    ActiveModel as CourseStudentActiveModel, Column as CourseStudentColumn,
    Entity as CourseStudents,
};
use crate::entity::courses::{ActiveModel, Column, Entity as Courses};
use crate::errors::{GraderError, Result};
use crate::models::courses::entities::{Course, CreateCourseRequest};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 创建课程
    pub async fn create_course_impl(&self, req: CreateCourseRequest) -> Result<Course> {
        let model = ActiveModel {
            teacher_id: Set(req.teacher_id),
            name: Set(req.name),
            description: Set(req.description),
            created_at: Set(now_millis()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("创建课程失败: {e}")))?;

        Ok(result.into_course())
    }

    /// 通过 ID 获取课程
    pub async fn get_course_by_id_impl(&self, course_id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(course_id)
            .one(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    /// 教师名下的课程 ID
    pub async fn list_teacher_course_ids_impl(&self, teacher_id: i64) -> Result<Vec<i64>> {
        Courses::find()
            .select_only()
            .column(Column::Id)
            .filter(Column::TeacherId.eq(teacher_id))
            .order_by_asc(Column::Id)
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("查询教师课程失败: {e}")))
    }

    /// 学生选课，已选则忽略
    pub async fn enroll_student_impl(&self, course_id: i64, student_id: i64) -> Result<()> {
        if self.is_student_enrolled_impl(course_id, student_id).await? {
            return Ok(());
        }

        let model = CourseStudentActiveModel {
            course_id: Set(course_id),
            student_id: Set(student_id),
            joined_at: Set(now_millis()),
            ..Default::default()
        };

        model
            .insert(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("加入课程失败: {e}")))?;

        Ok(())
    }

    /// 学生是否已选课
    pub async fn is_student_enrolled_impl(&self, course_id: i64, student_id: i64) -> Result<bool> {
        let count = CourseStudents::find()
            .filter(CourseStudentColumn::CourseId.eq(course_id))
            .filter(CourseStudentColumn::StudentId.eq(student_id))
            .count(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("查询选课信息失败: {e}")))?;

        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{seed_course, seed_student, setup_storage};

    #[tokio::test]
    async fn test_teacher_course_ids_and_enrollment() {
        let storage = setup_storage().await;
        let fx = seed_course(&storage, "a").await;
        let student = seed_student(&storage, "stu_a", fx.course_id).await;

        let ids = storage
            .list_teacher_course_ids_impl(fx.teacher_id)
            .await
            .unwrap();
        assert_eq!(ids, vec![fx.course_id]);

        assert!(
            storage
                .is_student_enrolled_impl(fx.course_id, student)
                .await
                .unwrap()
        );
        // 重复选课不报错
        storage
            .enroll_student_impl(fx.course_id, student)
            .await
            .unwrap();
        assert!(
            !storage
                .is_student_enrolled_impl(fx.course_id, fx.teacher_id)
                .await
                .unwrap()
        );
    }
}
