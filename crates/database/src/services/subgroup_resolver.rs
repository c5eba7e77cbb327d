use crate::entities::subgroups;
use log::debug;
use models::subgroup_ref::SubgroupRef;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

/// Turns client-supplied subgroup references into subgroup ids.
///
/// Resolution is best-effort: any reference that cannot be matched to a
/// subgroup valid for the target group and subject resolves to `None`,
/// meaning the entry applies to the whole group. Only storage failures are
/// returned as errors.
pub struct SubgroupResolver;

impl SubgroupResolver {
    pub async fn resolve(
        db: &DatabaseConnection,
        raw: Option<&str>,
        group_id: Option<Uuid>,
        subject_id: Uuid,
    ) -> Result<Option<Uuid>, DbErr> {
        let reference = SubgroupRef::parse(raw);

        let resolved = match &reference {
            SubgroupRef::WholeGroup => None,
            SubgroupRef::Ordinal(number) => match group_id {
                Some(group_id) => Self::find_by_number(db, group_id, subject_id, *number).await?,
                None => None,
            },
            SubgroupRef::Direct(raw_id) => match Uuid::parse_str(raw_id) {
                Ok(id) => Self::revalidate(db, id, group_id, subject_id).await?,
                Err(_) => None,
            },
        };

        debug!("Resolved {reference} for group {group_id:?}, subject {subject_id} to {resolved:?}");
        Ok(resolved)
    }

    /// Checks that subgroup `id` exists and fits the given group and subject
    pub async fn revalidate(
        db: &DatabaseConnection,
        id: Uuid,
        group_id: Option<Uuid>,
        subject_id: Uuid,
    ) -> Result<Option<Uuid>, DbErr> {
        // A subgroup always belongs to a group, so it can't fit an entry without one
        let Some(group_id) = group_id else {
            return Ok(None);
        };

        let subgroup = subgroups::Entity::find_by_id(id).one(db).await?;

        Ok(subgroup
            .filter(|subgroup| subgroup.fits(group_id, subject_id))
            .map(|subgroup| subgroup.id))
    }

    async fn find_by_number(
        db: &DatabaseConnection,
        group_id: Uuid,
        subject_id: Uuid,
        number: i32,
    ) -> Result<Option<Uuid>, DbErr> {
        let candidates = subgroups::Entity::find()
            .filter(subgroups::Column::GroupId.eq(group_id))
            .filter(subgroups::Column::Number.eq(number))
            .filter(subgroups::Column::IsActive.eq(true))
            .filter(
                Condition::any()
                    .add(subgroups::Column::SubjectId.is_null())
                    .add(subgroups::Column::SubjectId.eq(subject_id)),
            )
            .order_by_asc(subgroups::Column::Id)
            .all(db)
            .await?;

        Ok(most_specific(&candidates).map(|subgroup| subgroup.id))
    }
}

/// Prefers a subject-scoped subgroup over a group-wide one
fn most_specific(candidates: &[subgroups::Model]) -> Option<&subgroups::Model> {
    candidates
        .iter()
        .find(|subgroup| subgroup.is_subject_scoped())
        .or_else(|| candidates.first())
}
