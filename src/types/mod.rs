//! Common Types Module
//!
//! 인증/세션 레이어가 요청에 남겨두는 값 객체들.
//! 이 크레이트는 읽기만 하고 절대 수정하지 않음.

use serde::{Deserialize, Serialize};

/// 데모 계정의 principal 이름
pub const DEMO_USERNAME: &str = "user";

/// 사용자 권한
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    PostUser,
    User,
}

/// 현재 로그인한 사용자
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub email: String,
    pub roles: Vec<Role>,
}

impl CurrentUser {
    pub fn new(id: i64, username: &str, roles: &[Role]) -> Self {
        Self {
            id,
            username: username.to_string(),
            display_name: username.to_string(),
            email: String::new(),
            roles: roles.to_vec(),
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }

    pub fn is_post_user(&self) -> bool {
        self.has_role(Role::PostUser)
    }
}

/// 인증 정보 (security context)
///
/// 업스트림 인증 레이어가 request extension으로 넣어줌.
/// `name`은 principal의 username과 다를 수 있음 (예: 소셜 로그인).
#[derive(Debug, Clone)]
pub struct Authentication {
    name: String,
    principal: CurrentUser,
}

impl Authentication {
    pub fn new(principal: CurrentUser) -> Self {
        Self {
            name: principal.username.clone(),
            principal,
        }
    }

    pub fn with_name(name: &str, principal: CurrentUser) -> Self {
        Self {
            name: name.to_string(),
            principal,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn principal(&self) -> &CurrentUser {
        &self.principal
    }
}

/// 소셜 계정 연결 정보 (세션에 저장됨)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserConnection {
    pub provider_id: String,
    pub provider_user_id: String,
    pub display_name: String,
    pub profile_url: Option<String>,
    pub image_url: Option<String>,
}
