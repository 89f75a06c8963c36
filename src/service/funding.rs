//! Funding programs and applications business logic

use crate::domain::{
    ApplicationStatus, CreateApplicationInput, CreateFundingProgramInput, FundingApplication,
    FundingApplicationView, FundingProgram, FundingProgramQuery, Principal, StringUuid,
    UpdateFundingProgramInput,
};
use crate::error::{AppError, Result};
use crate::policy::{
    enforce, require_party, require_provider_or_admin, OwnershipCheck, PolicyAction,
};
use crate::repository::funding_application::DUPLICATE_APPLICATION;
use crate::repository::{FundingApplicationRepository, FundingProgramRepository};
use chrono::Utc;
use std::sync::Arc;
use validator::Validate;

pub struct FundingService<F: FundingProgramRepository, A: FundingApplicationRepository> {
    program_repo: Arc<F>,
    application_repo: Arc<A>,
}

impl<F: FundingProgramRepository, A: FundingApplicationRepository> FundingService<F, A> {
    pub fn new(program_repo: Arc<F>, application_repo: Arc<A>) -> Self {
        Self {
            program_repo,
            application_repo,
        }
    }

    pub async fn list_programs(&self, query: &FundingProgramQuery) -> Result<Vec<FundingProgram>> {
        self.program_repo.list(query).await
    }

    pub async fn get_program(&self, id: StringUuid) -> Result<FundingProgram> {
        self.program_repo.find_by_id(id).await?.or_not_found()
    }

    /// Investors and admin-class principals.
    pub async fn create_program(
        &self,
        principal: &Principal,
        input: CreateFundingProgramInput,
    ) -> Result<FundingProgram> {
        enforce(principal, PolicyAction::ProgramCreate)?;
        input.validate()?;

        let now = Utc::now();
        let program = FundingProgram {
            id: StringUuid::new_v4(),
            title: input.title,
            description: input.description,
            amount: input.amount,
            funding_type: input.funding_type,
            deadline: input.deadline,
            requirements: input.requirements,
            interest_rate: input.interest_rate,
            provider_id: principal.id,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let created = self.program_repo.create(&program).await?;
        tracing::info!(program_id = %created.id, provider_id = %created.provider_id, "funding program posted");
        Ok(created)
    }

    pub async fn update_program(
        &self,
        principal: &Principal,
        id: StringUuid,
        input: UpdateFundingProgramInput,
    ) -> Result<FundingProgram> {
        input.validate()?;
        let mut program = self
            .program_repo
            .find_by_id(id)
            .await?
            .authorize_owner(principal, PolicyAction::ProgramUpdate)?;

        program.apply(input);
        self.program_repo.update(&program).await
    }

    pub async fn delete_program(&self, principal: &Principal, id: StringUuid) -> Result<()> {
        self.program_repo
            .find_by_id(id)
            .await?
            .authorize_owner(principal, PolicyAction::ProgramDelete)?;

        self.program_repo.delete(id).await?;
        tracing::info!(program_id = %id, deleted_by = %principal.id, "funding program deleted");
        Ok(())
    }

    /// Farmers only, once per program.
    pub async fn apply(
        &self,
        principal: &Principal,
        input: CreateApplicationInput,
    ) -> Result<FundingApplication> {
        enforce(principal, PolicyAction::ApplicationCreate)?;
        input.validate()?;

        let program = self
            .program_repo
            .find_by_id(input.program_id)
            .await?
            .or_not_found()?;

        if self
            .application_repo
            .find_by_program_and_applicant(program.id, principal.id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(DUPLICATE_APPLICATION.to_string()));
        }

        let now = Utc::now();
        let application = FundingApplication {
            id: StringUuid::new_v4(),
            program_id: program.id,
            applicant_id: principal.id,
            status: ApplicationStatus::Pending,
            proposal_text: input.proposal_text,
            amount_requested: input.amount_requested,
            documents: input.documents,
            reviewed_at: None,
            created_at: now,
            updated_at: now,
        };

        let created = self.application_repo.create(&application).await?;
        tracing::info!(
            application_id = %created.id,
            program_id = %created.program_id,
            applicant_id = %created.applicant_id,
            "funding application submitted"
        );
        Ok(created)
    }

    pub async fn my_applications(
        &self,
        principal: &Principal,
    ) -> Result<Vec<FundingApplicationView>> {
        self.application_repo.list_by_applicant(principal.id).await
    }

    /// Applications on every program the principal provides.
    pub async fn provider_applications(
        &self,
        principal: &Principal,
    ) -> Result<Vec<FundingApplicationView>> {
        self.application_repo.list_by_provider(principal.id).await
    }

    pub async fn program_applications(
        &self,
        principal: &Principal,
        program_id: StringUuid,
    ) -> Result<Vec<FundingApplicationView>> {
        let program = self
            .program_repo
            .find_by_id(program_id)
            .await?
            .or_not_found()?;
        require_provider_or_admin(principal, PolicyAction::ProgramApplicationsRead, &program)?;

        self.application_repo.list_by_program(program_id).await
    }

    /// Visible to the applicant, the program's provider and admin-class
    /// principals. Anyone else gets `NotFound`.
    pub async fn get_application(
        &self,
        principal: &Principal,
        id: StringUuid,
    ) -> Result<FundingApplication> {
        let application = self.application_repo.find_by_id(id).await?.or_not_found()?;
        let provider = self
            .program_repo
            .find_by_id(application.program_id)
            .await?
            .map(|program| program.provider_id);

        let mut parties = vec![application.applicant_id];
        parties.extend(provider);
        require_party(
            principal,
            PolicyAction::ApplicationRead,
            "application",
            &parties,
            true,
        )?;

        Ok(application)
    }

    /// Provider or admin-class. Every update stamps `reviewed_at`.
    pub async fn update_application_status(
        &self,
        principal: &Principal,
        id: StringUuid,
        status: ApplicationStatus,
    ) -> Result<FundingApplication> {
        let application = self.application_repo.find_by_id(id).await?.or_not_found()?;
        let program = self
            .program_repo
            .find_by_id(application.program_id)
            .await?
            .or_not_found()?;
        require_provider_or_admin(principal, PolicyAction::ApplicationStatusUpdate, &program)?;

        let updated = self
            .application_repo
            .update_status(id, status, Utc::now())
            .await?;
        tracing::info!(application_id = %id, status = %status, reviewed_by = %principal.id, "application reviewed");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FundingType, Role};
    use crate::repository::funding_application::MockFundingApplicationRepository;
    use crate::repository::funding_program::MockFundingProgramRepository;
    use mockall::predicate::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    type TestService = FundingService<MockFundingProgramRepository, MockFundingApplicationRepository>;

    fn principal(role: Role) -> Principal {
        Principal {
            id: StringUuid::new_v4(),
            role,
            email: "p@example.com".to_string(),
            name: "P".to_string(),
            region: None,
            phone: None,
            is_verified: true,
            permissions: vec![],
            pool: role.pool(),
        }
    }

    fn service(
        programs: MockFundingProgramRepository,
        applications: MockFundingApplicationRepository,
    ) -> TestService {
        FundingService::new(Arc::new(programs), Arc::new(applications))
    }

    fn programs_with(program: FundingProgram) -> MockFundingProgramRepository {
        let mut mock = MockFundingProgramRepository::new();
        mock.expect_find_by_id()
            .returning(move |_| Ok(Some(program.clone())));
        mock
    }

    fn application_input(program_id: StringUuid) -> CreateApplicationInput {
        CreateApplicationInput {
            program_id,
            proposal_text: "Drip irrigation for two hectares".to_string(),
            amount_requested: 1500.0,
            documents: vec![],
        }
    }

    fn program_input() -> CreateFundingProgramInput {
        CreateFundingProgramInput {
            title: "Smallholder loan".to_string(),
            description: "Working capital".to_string(),
            amount: 5000.0,
            funding_type: FundingType::Loan,
            deadline: None,
            requirements: None,
            interest_rate: 4.5,
        }
    }

    #[rstest]
    #[case(Role::Investor, true)]
    #[case(Role::Admin, true)]
    #[case(Role::Moderator, true)]
    #[case(Role::Farmer, false)]
    #[case(Role::Buyer, false)]
    #[tokio::test]
    async fn test_create_program_by_role(#[case] role: Role, #[case] allowed: bool) {
        let mut programs = MockFundingProgramRepository::new();
        programs
            .expect_create()
            .times(usize::from(allowed))
            .returning(|p| Ok(p.clone()));

        let caller = principal(role);
        let result = service(programs, MockFundingApplicationRepository::new())
            .create_program(&caller, program_input())
            .await;

        if allowed {
            let program = result.unwrap();
            assert_eq!(program.provider_id, caller.id);
            assert!(program.is_active);
        } else {
            assert!(matches!(result, Err(AppError::Forbidden(_))));
        }
    }

    #[tokio::test]
    async fn test_second_application_is_conflict() {
        let program = FundingProgram::default();
        let program_id = program.id;
        let farmer = principal(Role::Farmer);
        let existing = FundingApplication {
            program_id,
            applicant_id: farmer.id,
            ..Default::default()
        };

        let mut applications = MockFundingApplicationRepository::new();
        applications
            .expect_find_by_program_and_applicant()
            .with(eq(program_id), eq(farmer.id))
            .returning(move |_, _| Ok(Some(existing.clone())));
        applications.expect_create().never();

        let err = service(programs_with(program), applications)
            .apply(&farmer, application_input(program_id))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref m) if m == DUPLICATE_APPLICATION));
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_rejected_by_insert() {
        let program = FundingProgram::default();
        let program_id = program.id;
        let mut applications = MockFundingApplicationRepository::new();
        applications
            .expect_find_by_program_and_applicant()
            .returning(|_, _| Ok(None));
        applications
            .expect_create()
            .times(1)
            .returning(|_| Err(AppError::Conflict(DUPLICATE_APPLICATION.to_string())));

        let err = service(programs_with(program), applications)
            .apply(&principal(Role::Farmer), application_input(program_id))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref m) if m == DUPLICATE_APPLICATION));
    }

    #[tokio::test]
    async fn test_first_application_is_pending() {
        let program = FundingProgram::default();
        let program_id = program.id;
        let mut applications = MockFundingApplicationRepository::new();
        applications
            .expect_find_by_program_and_applicant()
            .returning(|_, _| Ok(None));
        applications.expect_create().returning(|a| Ok(a.clone()));

        let farmer = principal(Role::Farmer);
        let application = service(programs_with(program), applications)
            .apply(&farmer, application_input(program_id))
            .await
            .unwrap();
        assert_eq!(application.status, ApplicationStatus::Pending);
        assert_eq!(application.applicant_id, farmer.id);
        assert!(application.reviewed_at.is_none());
    }

    #[tokio::test]
    async fn test_apply_to_missing_program() {
        let mut programs = MockFundingProgramRepository::new();
        programs.expect_find_by_id().returning(|_| Ok(None));
        let err = service(programs, MockFundingApplicationRepository::new())
            .apply(&principal(Role::Farmer), application_input(StringUuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "Program not found"));
    }

    #[tokio::test]
    async fn test_investor_cannot_apply() {
        let err = service(
            MockFundingProgramRepository::new(),
            MockFundingApplicationRepository::new(),
        )
        .apply(&principal(Role::Investor), application_input(StringUuid::new_v4()))
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[rstest]
    #[case(ApplicationStatus::UnderReview)]
    #[case(ApplicationStatus::Approved)]
    #[case(ApplicationStatus::Rejected)]
    #[tokio::test]
    async fn test_provider_reviews_application(#[case] status: ApplicationStatus) {
        let provider = principal(Role::Investor);
        let program = FundingProgram {
            provider_id: provider.id,
            ..Default::default()
        };
        let application = FundingApplication {
            program_id: program.id,
            applicant_id: StringUuid::new_v4(),
            ..Default::default()
        };
        let application_id = application.id;

        let mut applications = MockFundingApplicationRepository::new();
        let stored = application.clone();
        applications
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        applications
            .expect_update_status()
            .withf(move |id, s, _| *id == application_id && *s == status)
            .returning(move |_, status, reviewed_at| {
                Ok(FundingApplication {
                    status,
                    reviewed_at: Some(reviewed_at),
                    ..application.clone()
                })
            });

        let updated = service(programs_with(program), applications)
            .update_application_status(&provider, application_id, status)
            .await
            .unwrap();
        assert_eq!(updated.status, status);
        assert!(updated.reviewed_at.is_some());
    }

    #[tokio::test]
    async fn test_applicant_cannot_review_own_application() {
        let farmer = principal(Role::Farmer);
        let program = FundingProgram {
            provider_id: StringUuid::new_v4(),
            ..Default::default()
        };
        let application = FundingApplication {
            program_id: program.id,
            applicant_id: farmer.id,
            ..Default::default()
        };
        let mut applications = MockFundingApplicationRepository::new();
        applications
            .expect_find_by_id()
            .returning(move |_| Ok(Some(application.clone())));
        applications.expect_update_status().never();

        let err = service(programs_with(program), applications)
            .update_application_status(&farmer, StringUuid::new_v4(), ApplicationStatus::Approved)
            .await
            .unwrap_err();
        assert!(
            matches!(err, AppError::Forbidden(ref m) if m == "Not authorized to update this application")
        );
    }

    #[tokio::test]
    async fn test_program_applications_requires_provider() {
        let program = FundingProgram {
            provider_id: StringUuid::new_v4(),
            ..Default::default()
        };
        let mut applications = MockFundingApplicationRepository::new();
        applications.expect_list_by_program().never();

        let err = service(programs_with(program), applications)
            .program_applications(&principal(Role::Investor), StringUuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_get_application_visibility() {
        let applicant = principal(Role::Farmer);
        let provider = principal(Role::Investor);
        let program = FundingProgram {
            provider_id: provider.id,
            ..Default::default()
        };
        let application = FundingApplication {
            program_id: program.id,
            applicant_id: applicant.id,
            ..Default::default()
        };
        let mut applications = MockFundingApplicationRepository::new();
        applications
            .expect_find_by_id()
            .returning(move |_| Ok(Some(application.clone())));

        let svc = service(programs_with(program), applications);
        let id = StringUuid::new_v4();
        assert!(svc.get_application(&applicant, id).await.is_ok());
        assert!(svc.get_application(&provider, id).await.is_ok());
        assert!(svc.get_application(&principal(Role::Moderator), id).await.is_ok());
        assert!(matches!(
            svc.get_application(&principal(Role::Farmer), id).await,
            Err(AppError::NotFound(ref m)) if m == "Application not found"
        ));
    }
}
