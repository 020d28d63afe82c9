//! Reference data a protocol points at: customers, branches, sales personnel and protocol types.

use sqlx::PgPool;

use crate::database::models::{
    Branch, BranchInput, Customer, CustomerInput, PersonnelInput, ProtocolType, ProtocolTypeInput, SalesPersonnel,
};
use crate::database::Repository;
use crate::services::error::{ServiceError, ServiceResult};
use crate::services::require_text;

#[derive(Clone)]
pub struct CustomerService {
    pool: PgPool,
}

impl CustomerService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn repo(&self) -> Repository<Customer> {
        Repository::new("customers", "customer_id", self.pool.clone())
    }

    pub async fn get_all(&self) -> ServiceResult<Vec<Customer>> {
        self.repo().select_all(Some("last_name, first_name, customer_id")).await
    }

    pub async fn get_by_id(&self, customer_id: i32) -> ServiceResult<Customer> {
        self.repo().select_404(customer_id).await
    }

    fn validate(input: &CustomerInput) -> ServiceResult<()> {
        require_text("first_name", &input.first_name)?;
        require_text("last_name", &input.last_name)?;
        require_text("email", &input.email)
    }

    pub async fn create(&self, input: CustomerInput) -> ServiceResult<Customer> {
        Self::validate(&input)?;
        let customer = sqlx::query_as::<_, Customer>(
            "INSERT INTO customers (first_name, last_name, email, phone, address, city, state, postal_code, \
             branch_id, active) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *",
        )
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(&input.city)
        .bind(&input.state)
        .bind(&input.postal_code)
        .bind(input.branch_id)
        .bind(input.active)
        .fetch_one(&self.pool)
        .await?;
        Ok(customer)
    }

    pub async fn update(&self, customer_id: i32, input: CustomerInput) -> ServiceResult<Customer> {
        Self::validate(&input)?;
        sqlx::query_as::<_, Customer>(
            "UPDATE customers SET first_name = $2, last_name = $3, email = $4, phone = $5, address = $6, \
             city = $7, state = $8, postal_code = $9, branch_id = $10, active = $11, updated_at = now() \
             WHERE customer_id = $1 RETURNING *",
        )
        .bind(customer_id)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(&input.city)
        .bind(&input.state)
        .bind(&input.postal_code)
        .bind(input.branch_id)
        .bind(input.active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::not_found(format!("customer {} not found", customer_id)))
    }

    pub async fn delete(&self, customer_id: i32) -> ServiceResult<()> {
        self.repo().delete(customer_id).await
    }
}

#[derive(Clone)]
pub struct BranchService {
    pool: PgPool,
}

impl BranchService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn repo(&self) -> Repository<Branch> {
        Repository::new("insurance_branches", "branch_id", self.pool.clone())
    }

    pub async fn get_all(&self) -> ServiceResult<Vec<Branch>> {
        self.repo().select_all(Some("branch_name, branch_id")).await
    }

    pub async fn get_by_id(&self, branch_id: i32) -> ServiceResult<Branch> {
        self.repo().select_404(branch_id).await
    }

    pub async fn create(&self, input: BranchInput) -> ServiceResult<Branch> {
        require_text("branch_name", &input.branch_name)?;
        require_text("branch_code", &input.branch_code)?;
        let branch = sqlx::query_as::<_, Branch>(
            "INSERT INTO insurance_branches (branch_name, branch_code) VALUES ($1, $2) RETURNING *",
        )
        .bind(&input.branch_name)
        .bind(&input.branch_code)
        .fetch_one(&self.pool)
        .await?;
        Ok(branch)
    }

    pub async fn update(&self, branch_id: i32, input: BranchInput) -> ServiceResult<Branch> {
        require_text("branch_name", &input.branch_name)?;
        require_text("branch_code", &input.branch_code)?;
        sqlx::query_as::<_, Branch>(
            "UPDATE insurance_branches SET branch_name = $2, branch_code = $3, updated_at = now() \
             WHERE branch_id = $1 RETURNING *",
        )
        .bind(branch_id)
        .bind(&input.branch_name)
        .bind(&input.branch_code)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::not_found(format!("branch {} not found", branch_id)))
    }

    pub async fn delete(&self, branch_id: i32) -> ServiceResult<()> {
        self.repo().delete(branch_id).await
    }
}

#[derive(Clone)]
pub struct PersonnelService {
    pool: PgPool,
}

impl PersonnelService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn repo(&self) -> Repository<SalesPersonnel> {
        Repository::new("sales_personnel", "personnel_id", self.pool.clone())
    }

    pub async fn get_all(&self) -> ServiceResult<Vec<SalesPersonnel>> {
        self.repo().select_all(Some("last_name, first_name, personnel_id")).await
    }

    pub async fn get_by_id(&self, personnel_id: i32) -> ServiceResult<SalesPersonnel> {
        self.repo().select_404(personnel_id).await
    }

    fn validate(input: &PersonnelInput) -> ServiceResult<()> {
        require_text("first_name", &input.first_name)?;
        require_text("last_name", &input.last_name)?;
        require_text("email", &input.email)
    }

    pub async fn create(&self, input: PersonnelInput) -> ServiceResult<SalesPersonnel> {
        Self::validate(&input)?;
        let personnel = sqlx::query_as::<_, SalesPersonnel>(
            "INSERT INTO sales_personnel (first_name, last_name, email, phone, branch_id, active) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(input.branch_id)
        .bind(input.active)
        .fetch_one(&self.pool)
        .await?;
        Ok(personnel)
    }

    pub async fn update(&self, personnel_id: i32, input: PersonnelInput) -> ServiceResult<SalesPersonnel> {
        Self::validate(&input)?;
        sqlx::query_as::<_, SalesPersonnel>(
            "UPDATE sales_personnel SET first_name = $2, last_name = $3, email = $4, phone = $5, \
             branch_id = $6, active = $7, updated_at = now() WHERE personnel_id = $1 RETURNING *",
        )
        .bind(personnel_id)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(input.branch_id)
        .bind(input.active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::not_found(format!("personnel {} not found", personnel_id)))
    }

    pub async fn delete(&self, personnel_id: i32) -> ServiceResult<()> {
        self.repo().delete(personnel_id).await
    }
}

#[derive(Clone)]
pub struct ProtocolTypeService {
    pool: PgPool,
}

impl ProtocolTypeService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn repo(&self) -> Repository<ProtocolType> {
        Repository::new("protocol_types", "type_id", self.pool.clone())
    }

    pub async fn get_all(&self) -> ServiceResult<Vec<ProtocolType>> {
        self.repo().select_all(Some("type_name, type_id")).await
    }

    pub async fn get_by_id(&self, type_id: i32) -> ServiceResult<ProtocolType> {
        self.repo().select_404(type_id).await
    }

    fn validate(input: &ProtocolTypeInput) -> ServiceResult<()> {
        require_text("type_name", &input.type_name)?;
        if input.default_deadline_days < 0 {
            return Err(ServiceError::invalid_argument("default_deadline_days must not be negative"));
        }
        Ok(())
    }

    pub async fn create(&self, input: ProtocolTypeInput) -> ServiceResult<ProtocolType> {
        Self::validate(&input)?;
        let protocol_type = sqlx::query_as::<_, ProtocolType>(
            "INSERT INTO protocol_types (type_name, description, default_deadline_days) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&input.type_name)
        .bind(&input.description)
        .bind(input.default_deadline_days)
        .fetch_one(&self.pool)
        .await?;
        Ok(protocol_type)
    }

    pub async fn update(&self, type_id: i32, input: ProtocolTypeInput) -> ServiceResult<ProtocolType> {
        Self::validate(&input)?;
        sqlx::query_as::<_, ProtocolType>(
            "UPDATE protocol_types SET type_name = $2, description = $3, default_deadline_days = $4, \
             updated_at = now() WHERE type_id = $1 RETURNING *",
        )
        .bind(type_id)
        .bind(&input.type_name)
        .bind(&input.description)
        .bind(input.default_deadline_days)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::not_found(format!("protocol type {} not found", type_id)))
    }

    pub async fn delete(&self, type_id: i32) -> ServiceResult<()> {
        self.repo().delete(type_id).await
    }
}
