//! Unit of Work pattern implementation.
//!
//! Every workflow transition that touches more than one row (report plus
//! review, request plus cases plus report) runs through
//! [`UnitOfWork::transaction`], so either all of its writes land or none do.

use async_trait::async_trait;
use chrono::NaiveDate;
use futures::future::BoxFuture;
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use super::repositories::{
    self, CounselingRepository, CounselingStore, GuidanceRepository, GuidanceStore,
    ReportRepository, ReportStore, ReviewRepository, ReviewStore, UserRepository, UserStore,
};
use crate::domain::{
    CaseStatus, CounselingRequest, CounselorCase, CounselorCaseInput, NewCounselingRequest,
    NewReport, Report, ReportStatus, RequestStatus, Stage, TeacherReview,
    TeacherReviewInput, TrackingCode,
};
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Provides pooled repositories for reads and transaction management for
/// writes. Not mockable directly because of the generic methods; tests run
/// it against an in-memory SQLite database instead.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn reports(&self) -> Arc<dyn ReportRepository>;

    fn reviews(&self) -> Arc<dyn ReviewRepository>;

    fn counseling(&self) -> Arc<dyn CounselingRepository>;

    fn guidance(&self) -> Arc<dyn GuidanceRepository>;

    /// Execute a closure within a transaction.
    ///
    /// Committed when the closure returns `Ok`, rolled back on `Err`.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> BoxFuture<'a, AppResult<T>> + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn reports(&self) -> TxReportRepository<'_> {
        TxReportRepository { txn: self.txn }
    }

    pub fn reviews(&self) -> TxReviewRepository<'_> {
        TxReviewRepository { txn: self.txn }
    }

    pub fn counseling(&self) -> TxCounselingRepository<'_> {
        TxCounselingRepository { txn: self.txn }
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
    report_repo: Arc<ReportStore>,
    review_repo: Arc<ReviewStore>,
    counseling_repo: Arc<CounselingStore>,
    guidance_repo: Arc<GuidanceStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            report_repo: Arc::new(ReportStore::new(db.clone())),
            review_repo: Arc::new(ReviewStore::new(db.clone())),
            counseling_repo: Arc::new(CounselingStore::new(db.clone())),
            guidance_repo: Arc::new(GuidanceStore::new(db.clone())),
            db,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn reports(&self) -> Arc<dyn ReportRepository> {
        self.report_repo.clone()
    }

    fn reviews(&self) -> Arc<dyn ReviewRepository> {
        self.review_repo.clone()
    }

    fn counseling(&self) -> Arc<dyn CounselingRepository> {
        self.counseling_repo.clone()
    }

    fn guidance(&self) -> Arc<dyn GuidanceRepository> {
        self.guidance_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> BoxFuture<'a, AppResult<T>> + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::ReadCommitted), Some(AccessMode::ReadWrite))
            .await?;

        match f(TransactionContext::new(&txn)).await {
            Ok(result) => {
                txn.commit().await?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Transaction-aware report repository.
pub struct TxReportRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxReportRepository<'a> {
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Report>> {
        repositories::find_report(self.txn, id).await
    }

    pub async fn tracking_code_exists(&self, code: &TrackingCode) -> AppResult<bool> {
        repositories::tracking_code_exists(self.txn, code).await
    }

    pub async fn create(&self, code: TrackingCode, new_report: NewReport) -> AppResult<Report> {
        repositories::insert_report(self.txn, code, new_report).await
    }

    /// Move the report to `stage` and set its status in one write.
    pub async fn advance(&self, id: Uuid, stage: Stage, status: ReportStatus) -> AppResult<Report> {
        repositories::update_progress(self.txn, id, Some(stage), status).await
    }

    pub async fn set_status(&self, id: Uuid, status: ReportStatus) -> AppResult<Report> {
        repositories::update_progress(self.txn, id, None, status).await
    }
}

/// Transaction-aware review and case repository.
pub struct TxReviewRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxReviewRepository<'a> {
    pub async fn upsert_teacher_review(
        &self,
        report_id: Uuid,
        teacher_id: Uuid,
        input: TeacherReviewInput,
    ) -> AppResult<TeacherReview> {
        repositories::upsert_teacher_review(self.txn, report_id, teacher_id, input).await
    }

    pub async fn upsert_counselor_case(
        &self,
        report_id: Uuid,
        counselor_id: Uuid,
        input: CounselorCaseInput,
    ) -> AppResult<CounselorCase> {
        repositories::upsert_counselor_case(self.txn, report_id, counselor_id, input).await
    }

    pub async fn has_confirmed_case(&self, report_id: Uuid) -> AppResult<bool> {
        repositories::case_with_status_exists(self.txn, report_id, CaseStatus::Confirmed).await
    }

    pub async fn settle_cases(&self, report_id: Uuid) -> AppResult<u64> {
        repositories::settle_cases(self.txn, report_id).await
    }
}

/// Transaction-aware counseling request repository.
pub struct TxCounselingRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxCounselingRepository<'a> {
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<CounselingRequest>> {
        repositories::find_request(self.txn, id).await
    }

    pub async fn open_request_exists(&self, student_id: Uuid, report_id: Uuid) -> AppResult<bool> {
        repositories::open_request_exists(self.txn, student_id, report_id).await
    }

    pub async fn create(
        &self,
        student_id: Uuid,
        request: NewCounselingRequest,
    ) -> AppResult<CounselingRequest> {
        repositories::insert_request(self.txn, student_id, request).await
    }

    pub async fn update(
        &self,
        id: Uuid,
        status: RequestStatus,
        scheduled_date: Option<NaiveDate>,
        handled_by: Uuid,
    ) -> AppResult<CounselingRequest> {
        repositories::update_request(self.txn, id, status, scheduled_date, handled_by).await
    }
}
