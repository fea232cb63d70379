// ==========================================
// 学院教务管理系统 - 考试座位编排 API
// ==========================================
// 职责: 生成编排（分配 + 持久化）、查询、展示分组、导出
// 红线: 名册为空时不写入任何考场/编排
// ==========================================

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::seating::{Arrangement, ArrangementSummary, Room, SeatRecord};
use crate::engine::arrangement_renderer::{render, RoomGroup};
use crate::engine::seat_allocator::{validate_capacity, SeatAllocator};
use crate::export::csv_export::render_csv;
use crate::export::pdf::render_pdf;
use crate::export::{build_seating_export, export_file_name, SeatingExport};
use crate::i18n::t_with_args;
use crate::repository::seating_repo::SeatingRepository;
use crate::repository::student_repo::StudentRepository;

// ==========================================
// 返回结构
// ==========================================

/// 生成编排结果
#[derive(Debug, Clone, Serialize)]
pub struct CreateArrangementResult {
    pub arrangement: Arrangement,
    pub unplaced_count: usize, // 超出容量未安排的学生数
    pub warning: Option<String>,
}

/// 编排展示视图（按考场分组）
#[derive(Debug, Clone, Serialize)]
pub struct ArrangementView {
    pub summary: ArrangementSummary,
    pub rooms: Vec<RoomGroup>,
}

/// 导出文件
#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// 座位编排API
pub struct SeatingApi {
    student_repo: Arc<StudentRepository>,
    seating_repo: Arc<SeatingRepository>,
    allocator: SeatAllocator,
}

impl SeatingApi {
    /// 创建新的SeatingApi实例（默认随机打乱院系顺序）
    pub fn new(
        student_repo: Arc<StudentRepository>,
        seating_repo: Arc<SeatingRepository>,
    ) -> Self {
        Self::with_allocator(student_repo, seating_repo, SeatAllocator::new())
    }

    /// 指定分配器（测试中注入固定顺序）
    pub fn with_allocator(
        student_repo: Arc<StudentRepository>,
        seating_repo: Arc<SeatingRepository>,
        allocator: SeatAllocator,
    ) -> Self {
        Self {
            student_repo,
            seating_repo,
            allocator,
        }
    }

    // ==========================================
    // 生成编排
    // ==========================================

    /// 生成并保存考试座位编排
    ///
    /// # 参数
    /// - exam_name: 考试名称
    /// - num_rooms: 考场数（>0）
    /// - seats_per_room: 每考场座位数（>0）
    /// - operator: 操作人
    ///
    /// # 返回
    /// - Ok(CreateArrangementResult): 已保存的编排 + 未安排人数
    /// - Err(ApiError::InvalidInput): 容量参数非法
    /// - Err(ApiError::EmptyRoster): 名册为空（不写入任何数据）
    pub fn create_arrangement(
        &self,
        exam_name: &str,
        num_rooms: i64,
        seats_per_room: i64,
        operator: &str,
    ) -> ApiResult<CreateArrangementResult> {
        let (num_rooms, seats_per_room) = validate_capacity(num_rooms, seats_per_room)?;

        let exam_name = exam_name.trim();
        if exam_name.is_empty() {
            return Err(ApiError::InvalidInput("考试名称不能为空".to_string()));
        }

        let students = self.student_repo.list_all()?;
        let assignments = self.allocator.allocate(&students, num_rooms, seats_per_room)?;

        let now = chrono::Local::now().naive_local();
        let rooms: Vec<Room> = (1..=num_rooms)
            .map(|ordinal| Room {
                room_id: uuid::Uuid::new_v4().to_string(),
                name: Room::display_name(ordinal),
                capacity: seats_per_room,
                created_at: now,
            })
            .collect();

        let records: Vec<SeatRecord> = assignments
            .iter()
            .map(|a| a.to_record(&rooms[a.room_index]))
            .collect();

        let arrangement = Arrangement {
            arrangement_id: uuid::Uuid::new_v4().to_string(),
            exam_name: exam_name.to_string(),
            num_rooms,
            seats_per_room,
            records,
            created_at: now,
        };
        let unplaced_count = students.len().saturating_sub(arrangement.records.len());

        let log = ActionLog::new(ActionType::SeatingCreated, operator)
            .with_target(&arrangement.arrangement_id)
            .with_payload(&serde_json::json!({
                "exam_name": arrangement.exam_name,
                "num_rooms": num_rooms,
                "seats_per_room": seats_per_room,
                "seated_count": arrangement.records.len(),
                "unplaced_count": unplaced_count,
            }))
            .with_detail(format!(
                "生成座位编排: {} ({}间考场, 每间{}座)",
                arrangement.exam_name, num_rooms, seats_per_room
            ));
        self.seating_repo.insert_arrangement(&rooms, &arrangement, &log)?;

        let warning = if unplaced_count > 0 {
            let capacity = arrangement.total_capacity().to_string();
            let unplaced = unplaced_count.to_string();
            let msg = t_with_args(
                "seating.overflow",
                &[("unplaced", unplaced.as_str()), ("capacity", capacity.as_str())],
            );
            warn!(
                arrangement_id = %arrangement.arrangement_id,
                unplaced_count,
                "考场容量不足，部分学生未安排"
            );
            Some(msg)
        } else {
            None
        };

        info!(
            arrangement_id = %arrangement.arrangement_id,
            seated = arrangement.records.len(),
            operator,
            "座位编排已生成"
        );

        Ok(CreateArrangementResult {
            arrangement,
            unplaced_count,
            warning,
        })
    }

    // ==========================================
    // 查询接口
    // ==========================================

    /// 编排列表（最新在前，不含座位明细）
    pub fn list_arrangements(&self) -> ApiResult<Vec<ArrangementSummary>> {
        Ok(self.seating_repo.list_summaries()?)
    }

    pub fn get_arrangement(&self, arrangement_id: &str) -> ApiResult<Arrangement> {
        self.seating_repo
            .find_by_id(arrangement_id)?
            .ok_or_else(|| {
                ApiError::NotFound(t_with_args("seating.not_found", &[("id", arrangement_id)]))
            })
    }

    /// 按考场分组展示（考场按首次出现顺序，考场内按座位号）
    pub fn view_arrangement(&self, arrangement_id: &str) -> ApiResult<ArrangementView> {
        let arrangement = self.get_arrangement(arrangement_id)?;
        let rooms = render(&arrangement.records);
        Ok(ArrangementView {
            summary: arrangement.summary(),
            rooms,
        })
    }

    // ==========================================
    // 导出接口
    // ==========================================

    pub fn build_export(&self, arrangement_id: &str) -> ApiResult<SeatingExport> {
        let arrangement = self.get_arrangement(arrangement_id)?;
        Ok(build_seating_export(&arrangement))
    }

    pub fn export_csv(&self, arrangement_id: &str) -> ApiResult<ExportedFile> {
        let export = self.build_export(arrangement_id)?;
        let bytes = render_csv(&export).map_err(|e| ApiError::InternalError(e.to_string()))?;
        info!(arrangement_id, rows = export.row_count(), "座位表已导出为CSV");
        Ok(ExportedFile {
            file_name: export_file_name(arrangement_id, "csv"),
            content_type: "text/csv",
            bytes,
        })
    }

    pub fn export_pdf(&self, arrangement_id: &str) -> ApiResult<ExportedFile> {
        let export = self.build_export(arrangement_id)?;
        let bytes = render_pdf(&export);
        info!(arrangement_id, rows = export.row_count(), "座位表已导出为PDF");
        Ok(ExportedFile {
            file_name: export_file_name(arrangement_id, "pdf"),
            content_type: "application/pdf",
            bytes,
        })
    }
}
