//! Validated construction and lookup of members.

use std::collections::HashSet;

use splitledger_domain::{Identifiable, Member, MemberId};

use crate::CoreError;

pub struct MemberService;

impl MemberService {
    /// Builds a member after checking the name.
    pub fn create(id: MemberId, name: &str) -> Result<Member, CoreError> {
        Self::validate_name(name)?;
        Ok(Member::new(id, name))
    }

    pub fn validate_name(name: &str) -> Result<(), CoreError> {
        if name.trim().is_empty() {
            return Err(CoreError::Validation("Member name is required".into()));
        }
        Ok(())
    }

    /// Checks names and id uniqueness across the roster.
    pub fn validate_roster(members: &[Member]) -> Result<(), CoreError> {
        let mut seen = HashSet::with_capacity(members.len());
        for member in members {
            Self::validate_name(&member.name)?;
            if !seen.insert(member.id) {
                return Err(CoreError::DuplicateMember(member.id));
            }
        }
        Ok(())
    }

    /// Renames a member in place; the avatar follows the new initial.
    pub fn rename(members: &mut [Member], id: MemberId, name: &str) -> Result<(), CoreError> {
        Self::validate_name(name)?;
        let member = members
            .iter_mut()
            .find(|member| member.id == id)
            .ok_or(CoreError::MemberNotFound(id))?;
        *member = Member::new(id, name);
        Ok(())
    }

    pub fn find(members: &[Member], id: MemberId) -> Result<&Member, CoreError> {
        members
            .iter()
            .find(|member| member.id() == id)
            .ok_or(CoreError::MemberNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_rejects_blank_names() {
        let err = MemberService::create(MemberId(1), "   ").expect_err("blank name must fail");
        assert!(matches!(err, CoreError::Validation(ref message) if message.contains("required")));
    }

    #[test]
    fn rename_rederives_avatar() {
        let mut members = vec![Member::new(MemberId(1), "Ana")];
        MemberService::rename(&mut members, MemberId(1), " zoe ").expect("rename");
        assert_eq!(members[0].name, "zoe");
        assert_eq!(members[0].avatar_label(), "Z");

        assert!(matches!(
            MemberService::rename(&mut members, MemberId(1), ""),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            MemberService::rename(&mut members, MemberId(4), "Max"),
            Err(CoreError::MemberNotFound(MemberId(4)))
        ));
    }

    #[test]
    fn roster_rejects_duplicate_ids() {
        let members = vec![
            Member::new(MemberId(1), "Ana"),
            Member::new(MemberId(1), "Ben"),
        ];
        let err = MemberService::validate_roster(&members).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateMember(MemberId(1))));
    }

    #[test]
    fn find_reports_missing_member() {
        let members = vec![Member::new(MemberId(1), "Ana")];
        assert_eq!(MemberService::find(&members, MemberId(1)).unwrap().name, "Ana");
        assert!(matches!(
            MemberService::find(&members, MemberId(2)),
            Err(CoreError::MemberNotFound(MemberId(2)))
        ));
    }
}
