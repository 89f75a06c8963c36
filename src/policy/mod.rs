//! Authorization and ownership engine.
//!
//! Every rule is a pure function of the resolved principal and, for
//! resource-scoped actions, the loaded target. Each decision is logged and
//! counted under `voss_authz_decisions_total{action,outcome}`.

use crate::domain::{
    FundingApplication, FundingProgram, LandInquiry, LandListing, Order, Principal, Product, Role,
    StringUuid,
};
use crate::error::AppError;
use crate::telemetry::metrics::AUTHZ_DECISIONS_TOTAL;
use metrics::counter;

pub type PolicyResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyAction {
    ProductCreate,
    ProductUpdate,
    ProductDelete,
    LandListingCreate,
    LandListingUpdate,
    LandListingDelete,
    InquiryCreate,
    InquiryRead,
    InquiryStatusUpdate,
    ProgramCreate,
    ProgramUpdate,
    ProgramDelete,
    ProgramApplicationsRead,
    ApplicationCreate,
    ApplicationRead,
    ApplicationStatusUpdate,
    OrderCreate,
    UserList,
    UserVerify,
    AdminInvite,
    SystemStats,
}

impl PolicyAction {
    pub fn as_str(self) -> &'static str {
        match self {
            PolicyAction::ProductCreate => "product_create",
            PolicyAction::ProductUpdate => "product_update",
            PolicyAction::ProductDelete => "product_delete",
            PolicyAction::LandListingCreate => "land_listing_create",
            PolicyAction::LandListingUpdate => "land_listing_update",
            PolicyAction::LandListingDelete => "land_listing_delete",
            PolicyAction::InquiryCreate => "inquiry_create",
            PolicyAction::InquiryRead => "inquiry_read",
            PolicyAction::InquiryStatusUpdate => "inquiry_status_update",
            PolicyAction::ProgramCreate => "program_create",
            PolicyAction::ProgramUpdate => "program_update",
            PolicyAction::ProgramDelete => "program_delete",
            PolicyAction::ProgramApplicationsRead => "program_applications_read",
            PolicyAction::ApplicationCreate => "application_create",
            PolicyAction::ApplicationRead => "application_read",
            PolicyAction::ApplicationStatusUpdate => "application_status_update",
            PolicyAction::OrderCreate => "order_create",
            PolicyAction::UserList => "user_list",
            PolicyAction::UserVerify => "user_verify",
            PolicyAction::AdminInvite => "admin_invite",
            PolicyAction::SystemStats => "system_stats",
        }
    }

    /// Verb used in denial messages ("Not authorized to update this product").
    fn verb(self) -> &'static str {
        match self {
            PolicyAction::ProductUpdate
            | PolicyAction::LandListingUpdate
            | PolicyAction::ProgramUpdate
            | PolicyAction::InquiryStatusUpdate
            | PolicyAction::ApplicationStatusUpdate
            | PolicyAction::UserVerify => "update",
            PolicyAction::ProductDelete
            | PolicyAction::LandListingDelete
            | PolicyAction::ProgramDelete => "delete",
            _ => "access",
        }
    }
}

/// A resource with exactly one owning principal, fixed at creation.
pub trait Ownable {
    /// Human-readable resource name used in error messages.
    const RESOURCE: &'static str;

    fn owner_id(&self) -> StringUuid;
}

impl Ownable for Product {
    const RESOURCE: &'static str = "product";

    fn owner_id(&self) -> StringUuid {
        self.seller_id
    }
}

impl Ownable for LandListing {
    const RESOURCE: &'static str = "listing";

    fn owner_id(&self) -> StringUuid {
        self.owner_id
    }
}

impl Ownable for FundingProgram {
    const RESOURCE: &'static str = "program";

    fn owner_id(&self) -> StringUuid {
        self.provider_id
    }
}

impl Ownable for FundingApplication {
    const RESOURCE: &'static str = "application";

    fn owner_id(&self) -> StringUuid {
        self.applicant_id
    }
}

impl Ownable for LandInquiry {
    const RESOURCE: &'static str = "inquiry";

    fn owner_id(&self) -> StringUuid {
        self.buyer_id
    }
}

impl Ownable for Order {
    const RESOURCE: &'static str = "order";

    fn owner_id(&self) -> StringUuid {
        self.buyer_id
    }
}

fn record(principal: &Principal, action: PolicyAction, allowed: bool) {
    let outcome = if allowed { "allow" } else { "deny" };
    counter!(AUTHZ_DECISIONS_TOTAL, "action" => action.as_str(), "outcome" => outcome)
        .increment(1);
    if allowed {
        tracing::debug!(
            principal_id = %principal.id,
            role = %principal.role,
            action = action.as_str(),
            "authorization allowed"
        );
    } else {
        tracing::info!(
            principal_id = %principal.id,
            role = %principal.role,
            action = action.as_str(),
            "authorization denied"
        );
    }
}

fn decide(principal: &Principal, action: PolicyAction, allowed: bool, deny: AppError) -> PolicyResult<()> {
    record(principal, action, allowed);
    if allowed {
        Ok(())
    } else {
        Err(deny)
    }
}

/// Role gates that do not depend on a target resource.
///
/// Resource-scoped actions always pass here; their owner or party check
/// happens once the target is loaded.
pub fn enforce(principal: &Principal, action: PolicyAction) -> PolicyResult<()> {
    let role = principal.role;
    match action {
        PolicyAction::ProductCreate => decide(
            principal,
            action,
            role == Role::Farmer,
            AppError::Forbidden("Only farmers can list products".to_string()),
        ),
        PolicyAction::ProgramCreate => decide(
            principal,
            action,
            role == Role::Investor || role.is_admin_class(),
            AppError::Forbidden("Only investors can post funding opportunities".to_string()),
        ),
        PolicyAction::ApplicationCreate => decide(
            principal,
            action,
            role == Role::Farmer,
            AppError::Forbidden("Only farmers can apply for funding".to_string()),
        ),
        PolicyAction::UserList
        | PolicyAction::UserVerify
        | PolicyAction::AdminInvite
        | PolicyAction::SystemStats => decide(
            principal,
            action,
            role == Role::Admin,
            AppError::Forbidden("Admin access required".to_string()),
        ),
        _ => Ok(()),
    }
}

/// Owner-or-admin-class rule for mutations on an ownable resource.
pub fn require_owner_or_admin<R: Ownable>(
    principal: &Principal,
    action: PolicyAction,
    resource: &R,
) -> PolicyResult<()> {
    let allowed = resource.owner_id() == principal.id || principal.is_admin_class();
    decide(
        principal,
        action,
        allowed,
        AppError::Forbidden(format!(
            "Not authorized to {} this {}",
            action.verb(),
            R::RESOURCE
        )),
    )
}

/// Applications are governed through their program: the provider, or any
/// admin-class principal.
pub fn require_provider_or_admin(
    principal: &Principal,
    action: PolicyAction,
    program: &FundingProgram,
) -> PolicyResult<()> {
    let allowed = program.provider_id == principal.id || principal.is_admin_class();
    let message = match action {
        PolicyAction::ProgramApplicationsRead => {
            "Not authorized to view these applications".to_string()
        }
        _ => format!("Not authorized to {} this application", action.verb()),
    };
    decide(principal, action, allowed, AppError::Forbidden(message))
}

/// Only the owner of the inquired land may move an inquiry's status. There
/// is no admin-class override.
pub fn require_land_owner(principal: &Principal, land: &LandListing) -> PolicyResult<()> {
    decide(
        principal,
        PolicyAction::InquiryStatusUpdate,
        land.owner_id == principal.id,
        AppError::Forbidden("Not authorized to update this inquiry".to_string()),
    )
}

/// Reads of a private resource: a caller who is not a party learns nothing,
/// not even that the resource exists.
pub fn require_party(
    principal: &Principal,
    action: PolicyAction,
    resource: &'static str,
    parties: &[StringUuid],
    admin_override: bool,
) -> PolicyResult<()> {
    let allowed =
        parties.contains(&principal.id) || (admin_override && principal.is_admin_class());
    decide(
        principal,
        action,
        allowed,
        AppError::NotFound(format!("{} not found", capitalize(resource))),
    )
}

/// A land owner may not inquire on their own listing.
pub fn reject_self_inquiry(principal: &Principal, land: &LandListing) -> PolicyResult<()> {
    decide(
        principal,
        PolicyAction::InquiryCreate,
        land.owner_id != principal.id,
        AppError::InvalidOperation("You cannot inquire on your own land".to_string()),
    )
}

/// Load-then-authorize for an optional lookup result.
pub trait OwnershipCheck<T> {
    /// `None` becomes `NotFound`; otherwise the owner-or-admin-class rule.
    fn authorize_owner(self, principal: &Principal, action: PolicyAction) -> PolicyResult<T>;

    /// `None` becomes `NotFound`.
    fn or_not_found(self) -> PolicyResult<T>;
}

impl<T: Ownable> OwnershipCheck<T> for Option<T> {
    fn authorize_owner(self, principal: &Principal, action: PolicyAction) -> PolicyResult<T> {
        let resource = self.or_not_found()?;
        require_owner_or_admin(principal, action, &resource)?;
        Ok(resource)
    }

    fn or_not_found(self) -> PolicyResult<T> {
        self.ok_or_else(|| AppError::NotFound(format!("{} not found", capitalize(T::RESOURCE))))
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
