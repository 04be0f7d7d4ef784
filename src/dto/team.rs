use serde::Serialize;

/// One team with its members, as shown on the roster page.
#[derive(Debug, Serialize)]
pub struct TeamView {
    pub team: String,
    pub members: Vec<MemberView>,
}

#[derive(Debug, Serialize)]
pub struct MemberView {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct TeamPageData {
    pub teams: Vec<TeamView>,
}
