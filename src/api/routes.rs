//! Route construction for the curriculum backend.
//!
//! Keeping paths in one place avoids string drift across the per-entity
//! reconciliation code.

pub fn rps(rps_id: u64) -> String {
    format!("/rps/{rps_id}")
}

pub fn courses() -> String {
    "/courses?eligible=true".to_string()
}

pub fn outcomes() -> String {
    "/cpl?status=published".to_string()
}

pub fn cpmk_create(rps_id: u64) -> String {
    format!("/rps/{rps_id}/cpmk")
}

pub fn cpmk(cpmk_id: u64) -> String {
    format!("/rps/cpmk/{cpmk_id}")
}

pub fn sub_cpmk_list(cpmk_id: u64) -> String {
    format!("/rps/cpmk/{cpmk_id}/sub-cpmk")
}

pub fn sub_cpmk_create(cpmk_id: u64) -> String {
    format!("/rps/cpmk/{cpmk_id}/sub-cpmk")
}

pub fn sub_cpmk(sub_cpmk_id: u64) -> String {
    format!("/rps/sub-cpmk/{sub_cpmk_id}")
}

pub fn weekly_plan_create(rps_id: u64) -> String {
    format!("/rps/{rps_id}/weekly-plan")
}

pub fn weekly_plan(entry_id: u64) -> String {
    format!("/rps/weekly-plan/{entry_id}")
}

pub fn assignment_create(rps_id: u64) -> String {
    format!("/rps/{rps_id}/assignments")
}

pub fn assignment(assignment_id: u64) -> String {
    format!("/rps/assignments/{assignment_id}")
}

pub fn analysis_create(rps_id: u64) -> String {
    format!("/rps/{rps_id}/analysis")
}

pub fn analysis(analysis_id: u64) -> String {
    format!("/rps/analysis/{analysis_id}")
}

pub fn bibliography_create(rps_id: u64) -> String {
    format!("/rps/{rps_id}/bibliography")
}

pub fn bibliography(entry_id: u64) -> String {
    format!("/rps/bibliography/{entry_id}")
}

pub fn grading_scale_create(rps_id: u64) -> String {
    format!("/rps/{rps_id}/grading-scale")
}

pub fn grading_scale(row_id: u64) -> String {
    format!("/rps/grading-scale/{row_id}")
}

pub fn auth_refresh() -> String {
    "/auth/refresh".to_string()
}
