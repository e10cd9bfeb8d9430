use std::collections::HashSet;

/// 发起评分操作的教师身份
///
/// 授权沿 "课程 → 试题 → 答案" 的归属链进行：教师只能批改自己课程下的试题。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeacherPrincipal {
    pub teacher_id: i64,
    pub course_ids: HashSet<i64>,
}

impl TeacherPrincipal {
    pub fn new(teacher_id: i64, course_ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            teacher_id,
            course_ids: course_ids.into_iter().collect(),
        }
    }

    pub fn owns_course(&self, course_id: i64) -> bool {
        self.course_ids.contains(&course_id)
    }
}
