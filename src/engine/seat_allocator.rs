// ==========================================
// 学院教务管理系统 - 考场座位分配引擎
// ==========================================
// 职责: 按院系分组，院系间轮转（round-robin）逐个落座
// 输入: 学生名册 + 考场数 + 每场座位数
// 输出: 按落座顺序排列的 SeatAssignment 列表
// ==========================================
// 红线: 容量不足时静默截断（剩余学生不落座），不报错
// 说明: 轮转只保证院系交错，不做真实相邻座位检查
// ==========================================

use crate::domain::seating::SeatAssignment;
use crate::domain::student::Student;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use thiserror::Error;
use tracing::instrument;

// ==========================================
// AllocationError - 分配错误
// ==========================================
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    #[error("名册为空: 没有可编排的学生")]
    EmptyRoster,

    #[error(
        "考场参数无效: num_rooms={num_rooms}（1..={}）, seats_per_room={seats_per_room}（1..={}）",
        MAX_ROOMS,
        MAX_SEATS_PER_ROOM
    )]
    InvalidCapacity { num_rooms: i64, seats_per_room: i64 },
}

/// 单次编排考场数上限（每个考场落一行 exam_room）
pub const MAX_ROOMS: u32 = 1_000;

/// 每考场座位数上限
pub const MAX_SEATS_PER_ROOM: u32 = 1_000;

/// 校验考场参数（表单输入为有符号整数）
///
/// # 返回
/// - Ok((num_rooms, seats_per_room)): 1..=MAX_ROOMS, 1..=MAX_SEATS_PER_ROOM
/// - Err(AllocationError::InvalidCapacity)
pub fn validate_capacity(num_rooms: i64, seats_per_room: i64) -> Result<(u32, u32), AllocationError> {
    let invalid = || AllocationError::InvalidCapacity {
        num_rooms,
        seats_per_room,
    };
    let rooms = u32::try_from(num_rooms).map_err(|_| invalid())?;
    let seats = u32::try_from(seats_per_room).map_err(|_| invalid())?;
    if !(1..=MAX_ROOMS).contains(&rooms) || !(1..=MAX_SEATS_PER_ROOM).contains(&seats) {
        return Err(invalid());
    }
    Ok((rooms, seats))
}

// ==========================================
// DepartmentShuffler - 院系顺序置换源
// ==========================================
// 默认随机；测试可注入固定顺序/固定种子
pub trait DepartmentShuffler: Send + Sync {
    /// 原地置换院系列表
    fn shuffle(&self, departments: &mut [String]);
}

/// 每次调用随机置换（不固定种子）
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomShuffler;

impl DepartmentShuffler for RandomShuffler {
    fn shuffle(&self, departments: &mut [String]) {
        departments.shuffle(&mut rand::thread_rng());
    }
}

/// 固定种子置换（同输入同输出）
#[derive(Debug, Clone, Copy)]
pub struct SeededShuffler {
    pub seed: u64,
}

impl DepartmentShuffler for SeededShuffler {
    fn shuffle(&self, departments: &mut [String]) {
        let mut rng = StdRng::seed_from_u64(self.seed);
        departments.shuffle(&mut rng);
    }
}

/// 保持首次出现顺序
#[derive(Debug, Default, Clone, Copy)]
pub struct KeepOrder;

impl DepartmentShuffler for KeepOrder {
    fn shuffle(&self, _departments: &mut [String]) {}
}

// ==========================================
// SeatAllocator - 座位分配引擎
// ==========================================
pub struct SeatAllocator {
    shuffler: Arc<dyn DepartmentShuffler>,
}

impl SeatAllocator {
    /// 构造函数（随机院系顺序）
    pub fn new() -> Self {
        Self::with_shuffler(Arc::new(RandomShuffler))
    }

    /// 注入院系置换源
    pub fn with_shuffler(shuffler: Arc<dyn DepartmentShuffler>) -> Self {
        Self { shuffler }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 执行一次完整分配
    ///
    /// 规则：
    /// 1) 按院系分组，组内保持名册原顺序；院系按首次出现顺序收集后整体置换
    /// 2) dept_pointer 每轮必进 1（即使该院系已空），空院系同样消耗轮次
    /// 3) seat_index 达到 seats_per_room 时换下一考场；考场用尽立即停止
    ///
    /// # 返回
    /// - Ok(Vec<SeatAssignment>): 落座顺序（考场优先），长度 = min(名册人数, 总座位数)
    /// - Err(InvalidCapacity): 考场数或座位数为 0 或超出上限
    /// - Err(EmptyRoster): 名册为空
    #[instrument(skip(self, students), fields(roster_size = students.len()))]
    pub fn allocate<'a>(
        &self,
        students: &'a [Student],
        num_rooms: u32,
        seats_per_room: u32,
    ) -> Result<Vec<SeatAssignment<'a>>, AllocationError> {
        validate_capacity(i64::from(num_rooms), i64::from(seats_per_room))?;
        if students.is_empty() {
            return Err(AllocationError::EmptyRoster);
        }

        // 1. 院系分组
        let mut queues: HashMap<&str, VecDeque<&'a Student>> = HashMap::new();
        let mut first_seen: Vec<String> = Vec::new();
        for student in students {
            queues
                .entry(student.department.as_str())
                .or_insert_with(|| {
                    first_seen.push(student.department.clone());
                    VecDeque::new()
                })
                .push_back(student);
        }

        let departments = self.permuted_departments(first_seen);
        tracing::debug!(departments = ?departments, "院系轮转顺序");

        // 2. 轮转落座
        let total = students.len();
        let capacity = (num_rooms as usize).saturating_mul(seats_per_room as usize);
        let mut assignments = Vec::with_capacity(total.min(capacity));
        let mut room_index: usize = 0;
        let mut seat_index: u32 = 0;
        let mut dept_pointer: usize = 0;

        while assignments.len() < total {
            let dept = departments[dept_pointer % departments.len()].as_str();

            if let Some(student) = queues.get_mut(dept).and_then(VecDeque::pop_front) {
                if seat_index >= seats_per_room {
                    room_index += 1;
                    if room_index >= num_rooms as usize {
                        break;
                    }
                    seat_index = 0;
                }

                assignments.push(SeatAssignment {
                    student,
                    room_index,
                    seat_number: seat_index + 1,
                });
                seat_index += 1;
            }

            dept_pointer += 1;
        }

        if assignments.len() < total {
            tracing::warn!(
                placed = assignments.len(),
                unplaced = total - assignments.len(),
                num_rooms,
                seats_per_room,
                "考场容量不足，剩余学生未落座"
            );
        }

        Ok(assignments)
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 置换院系顺序；置换结果必须仍是原集合的排列，否则退回首次出现顺序
    fn permuted_departments(&self, first_seen: Vec<String>) -> Vec<String> {
        let mut departments = first_seen.clone();
        self.shuffler.shuffle(&mut departments);

        let expected: HashSet<&str> = first_seen.iter().map(String::as_str).collect();
        let actual: HashSet<&str> = departments.iter().map(String::as_str).collect();
        if departments.len() != first_seen.len() || expected != actual {
            tracing::warn!("院系置换结果不是原集合的排列，使用首次出现顺序");
            return first_seen;
        }
        departments
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for SeatAllocator {
    fn default() -> Self {
        Self::new()
    }
}
