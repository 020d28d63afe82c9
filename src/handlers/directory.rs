//! CRUD handlers for customers, branches, sales personnel and protocol types.

use axum::extract::State;

use crate::database::models::{
    Branch, BranchInput, Customer, CustomerInput, PersonnelInput, ProtocolType, ProtocolTypeInput, SalesPersonnel,
};
use crate::handlers::extract::{Body, Id};
use crate::handlers::AppState;
use crate::middleware::{ApiResponse, ApiResult};

pub mod customers {
    use super::*;

    pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Customer>> {
        Ok(ApiResponse::success(state.customers.get_all().await?))
    }

    pub async fn show(State(state): State<AppState>, Id(id): Id) -> ApiResult<Customer> {
        Ok(ApiResponse::success(state.customers.get_by_id(id).await?))
    }

    pub async fn create(State(state): State<AppState>, Body(input): Body<CustomerInput>) -> ApiResult<Customer> {
        Ok(ApiResponse::created(state.customers.create(input).await?))
    }

    pub async fn update(
        State(state): State<AppState>,
        Id(id): Id,
        Body(input): Body<CustomerInput>,
    ) -> ApiResult<Customer> {
        Ok(ApiResponse::success(state.customers.update(id, input).await?))
    }

    pub async fn delete(State(state): State<AppState>, Id(id): Id) -> ApiResult<()> {
        state.customers.delete(id).await?;
        Ok(ApiResponse::no_content())
    }
}

pub mod branches {
    use super::*;

    pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Branch>> {
        Ok(ApiResponse::success(state.branches.get_all().await?))
    }

    pub async fn show(State(state): State<AppState>, Id(id): Id) -> ApiResult<Branch> {
        Ok(ApiResponse::success(state.branches.get_by_id(id).await?))
    }

    pub async fn create(State(state): State<AppState>, Body(input): Body<BranchInput>) -> ApiResult<Branch> {
        Ok(ApiResponse::created(state.branches.create(input).await?))
    }

    pub async fn update(State(state): State<AppState>, Id(id): Id, Body(input): Body<BranchInput>) -> ApiResult<Branch> {
        Ok(ApiResponse::success(state.branches.update(id, input).await?))
    }

    pub async fn delete(State(state): State<AppState>, Id(id): Id) -> ApiResult<()> {
        state.branches.delete(id).await?;
        Ok(ApiResponse::no_content())
    }
}

pub mod personnel {
    use super::*;

    pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<SalesPersonnel>> {
        Ok(ApiResponse::success(state.personnel.get_all().await?))
    }

    pub async fn show(State(state): State<AppState>, Id(id): Id) -> ApiResult<SalesPersonnel> {
        Ok(ApiResponse::success(state.personnel.get_by_id(id).await?))
    }

    pub async fn create(
        State(state): State<AppState>,
        Body(input): Body<PersonnelInput>,
    ) -> ApiResult<SalesPersonnel> {
        Ok(ApiResponse::created(state.personnel.create(input).await?))
    }

    pub async fn update(
        State(state): State<AppState>,
        Id(id): Id,
        Body(input): Body<PersonnelInput>,
    ) -> ApiResult<SalesPersonnel> {
        Ok(ApiResponse::success(state.personnel.update(id, input).await?))
    }

    pub async fn delete(State(state): State<AppState>, Id(id): Id) -> ApiResult<()> {
        state.personnel.delete(id).await?;
        Ok(ApiResponse::no_content())
    }
}

pub mod types {
    use super::*;

    pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<ProtocolType>> {
        Ok(ApiResponse::success(state.types.get_all().await?))
    }

    pub async fn show(State(state): State<AppState>, Id(id): Id) -> ApiResult<ProtocolType> {
        Ok(ApiResponse::success(state.types.get_by_id(id).await?))
    }

    pub async fn create(
        State(state): State<AppState>,
        Body(input): Body<ProtocolTypeInput>,
    ) -> ApiResult<ProtocolType> {
        Ok(ApiResponse::created(state.types.create(input).await?))
    }

    pub async fn update(
        State(state): State<AppState>,
        Id(id): Id,
        Body(input): Body<ProtocolTypeInput>,
    ) -> ApiResult<ProtocolType> {
        Ok(ApiResponse::success(state.types.update(id, input).await?))
    }

    pub async fn delete(State(state): State<AppState>, Id(id): Id) -> ApiResult<()> {
        state.types.delete(id).await?;
        Ok(ApiResponse::no_content())
    }
}
