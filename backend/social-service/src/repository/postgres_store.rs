//! PostgreSQL social store
//!
//! Every mutation is a single SQL statement against one row (or one unique
//! key), so PostgreSQL row locking gives the per-record atomicity the
//! services need without explicit transactions.

use super::{ContentCounters, ContentQuery, GraphCounters, SocialStore};
use crate::config::DatabaseConfig;
use crate::domain::{
    Account, AccountRole, Comment, ContentEntity, EntityKind, FollowEdge, LikeState,
    MembershipSide, SetOp,
};
use chrono::{DateTime, Utc};
use error_types::{ErrorContext, SocialError, SocialResult};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

const ACCOUNT_COLUMNS: &str = "id, username, role, follower_ids, following_ids, \
     followers_count, following_count, created_at";

const CONTENT_COLUMNS: &str = "id, kind, owner_id, title, liked_by, likes_count, \
     comments_count, shares_count, is_public, created_at";

const COMMENT_COLUMNS: &str = "id, entity_kind, entity_id, author_id, body, created_at";

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    username: String,
    role: String,
    follower_ids: Vec<Uuid>,
    following_ids: Vec<Uuid>,
    followers_count: i64,
    following_count: i64,
    created_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = SocialError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let role: AccountRole = row
            .role
            .parse()
            .map_err(|e: String| SocialError::storage(anyhow::anyhow!(e)))?;
        Ok(Account {
            id: row.id,
            username: row.username,
            role,
            follower_ids: row.follower_ids.into_iter().collect(),
            following_ids: row.following_ids.into_iter().collect(),
            followers_count: row.followers_count,
            following_count: row.following_count,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ContentRow {
    id: Uuid,
    kind: String,
    owner_id: Uuid,
    title: String,
    liked_by: Vec<Uuid>,
    likes_count: i64,
    comments_count: i64,
    shares_count: i64,
    is_public: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<ContentRow> for ContentEntity {
    type Error = SocialError;

    fn try_from(row: ContentRow) -> Result<Self, Self::Error> {
        Ok(ContentEntity {
            id: row.id,
            kind: parse_kind(&row.kind)?,
            owner_id: row.owner_id,
            title: row.title,
            liked_by: row.liked_by.into_iter().collect(),
            likes_count: row.likes_count,
            comments_count: row.comments_count,
            shares_count: row.shares_count,
            is_public: row.is_public,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: Uuid,
    entity_kind: String,
    entity_id: Uuid,
    author_id: Uuid,
    body: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<CommentRow> for Comment {
    type Error = SocialError;

    fn try_from(row: CommentRow) -> Result<Self, Self::Error> {
        Ok(Comment {
            id: row.id,
            entity_kind: parse_kind(&row.entity_kind)?,
            entity_id: row.entity_id,
            author_id: row.author_id,
            body: row.body,
            created_at: row.created_at,
        })
    }
}

fn parse_kind(raw: &str) -> SocialResult<EntityKind> {
    raw.parse()
        .map_err(|e: String| SocialError::storage(anyhow::anyhow!(e)))
}

fn collect<R, T>(rows: Vec<R>) -> SocialResult<Vec<T>>
where
    T: TryFrom<R, Error = SocialError>,
{
    rows.into_iter().map(T::try_from).collect()
}

fn to_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

/// Create the connection pool and verify it with a round trip
pub async fn create_pool(config: &DatabaseConfig) -> SocialResult<PgPool> {
    debug!(
        max = config.max_connections,
        min = config.min_connections,
        "Creating database pool"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(600))
        .test_before_acquire(true)
        .connect(&config.url)
        .await
        .context("Failed to connect to PostgreSQL")?;

    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .context("Database connection verification failed")?;

    info!("Database pool created and verified successfully");
    Ok(pool)
}

#[derive(Clone)]
pub struct PgSocialStore {
    pool: PgPool,
}

impl PgSocialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply pending schema migrations
    pub async fn migrate(&self) -> SocialResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run migrations")?;
        info!("Social graph migrations applied");
        Ok(())
    }

    async fn account_exists(&self, id: Uuid) -> SocialResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM accounts WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn edge_ids(&self, sql: &str, id: Uuid) -> SocialResult<Vec<Uuid>> {
        let ids: Vec<Uuid> = sqlx::query_scalar(sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }
}

#[async_trait::async_trait]
impl SocialStore for PgSocialStore {
    async fn insert_account(&self, account: Account) -> SocialResult<()> {
        let follower_ids: Vec<Uuid> = account.follower_ids.into_iter().collect();
        let following_ids: Vec<Uuid> = account.following_ids.into_iter().collect();
        sqlx::query(
            r#"
            INSERT INTO accounts (id, username, role, follower_ids, following_ids,
                                  followers_count, following_count, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE
            SET username = EXCLUDED.username, role = EXCLUDED.role
            "#,
        )
        .bind(account.id)
        .bind(&account.username)
        .bind(account.role.as_str())
        .bind(&follower_ids)
        .bind(&following_ids)
        .bind(account.followers_count)
        .bind(account.following_count)
        .bind(account.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_account(&self, id: Uuid) -> SocialResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Account::try_from).transpose()
    }

    async fn get_accounts(&self, ids: &[Uuid]) -> SocialResult<Vec<Account>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        collect(rows)
    }

    async fn update_membership(
        &self,
        account_id: Uuid,
        side: MembershipSide,
        other: Uuid,
        op: SetOp,
    ) -> SocialResult<Option<bool>> {
        let (set, counter) = match side {
            MembershipSide::Followers => ("follower_ids", "followers_count"),
            MembershipSide::Following => ("following_ids", "following_count"),
        };
        // The guard makes the update a no-op when the set already agrees, so
        // the counter only moves together with the set.
        let sql = match op {
            SetOp::Add => format!(
                "UPDATE accounts SET {set} = array_append({set}, $2), {counter} = {counter} + 1 \
                 WHERE id = $1 AND NOT ($2 = ANY({set})) RETURNING id"
            ),
            SetOp::Remove => format!(
                "UPDATE accounts SET {set} = array_remove({set}, $2), {counter} = {counter} - 1 \
                 WHERE id = $1 AND $2 = ANY({set}) RETURNING id"
            ),
        };

        let updated: Option<Uuid> = sqlx::query_scalar(&sql)
            .bind(account_id)
            .bind(other)
            .fetch_optional(&self.pool)
            .await?;

        if updated.is_some() {
            return Ok(Some(true));
        }
        if self.account_exists(account_id).await? {
            Ok(Some(false))
        } else {
            Ok(None)
        }
    }

    async fn overwrite_graph_cache(
        &self,
        account_id: Uuid,
        follower_ids: &[Uuid],
        following_ids: &[Uuid],
    ) -> SocialResult<Option<GraphCounters>> {
        let row: Option<(i64, i64)> = sqlx::query_as(
            r#"
            WITH before AS (
                SELECT id, followers_count, following_count
                FROM accounts
                WHERE id = $1
                FOR UPDATE
            )
            UPDATE accounts a
            SET follower_ids = $2,
                following_ids = $3,
                followers_count = $4,
                following_count = $5
            FROM before
            WHERE a.id = before.id
            RETURNING before.followers_count, before.following_count
            "#,
        )
        .bind(account_id)
        .bind(follower_ids)
        .bind(following_ids)
        .bind(follower_ids.len() as i64)
        .bind(following_ids.len() as i64)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(followers_count, following_count)| GraphCounters {
            followers_count,
            following_count,
        }))
    }

    async fn list_account_ids(&self, after: Option<Uuid>, limit: usize) -> SocialResult<Vec<Uuid>> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            r#"
            SELECT id FROM accounts
            WHERE ($1::uuid IS NULL OR id > $1)
            ORDER BY id ASC
            LIMIT $2
            "#,
        )
        .bind(after)
        .bind(to_limit(limit))
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    async fn insert_edge(&self, edge: &FollowEdge) -> SocialResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO follow_edges (follower_id, followee_id, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (follower_id, followee_id) DO NOTHING
            "#,
        )
        .bind(edge.follower_id)
        .bind(edge.followee_id)
        .bind(edge.created_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_edge(&self, follower_id: Uuid, followee_id: Uuid) -> SocialResult<bool> {
        let result =
            sqlx::query("DELETE FROM follow_edges WHERE follower_id = $1 AND followee_id = $2")
                .bind(follower_id)
                .bind(followee_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn toggle_edge(&self, edge: &FollowEdge) -> SocialResult<bool> {
        // A conflicting insert means a concurrent caller created the edge, so
        // it exists afterwards either way.
        let following: bool = sqlx::query_scalar(
            r#"
            WITH removed AS (
                DELETE FROM follow_edges
                WHERE follower_id = $1 AND followee_id = $2
                RETURNING 1
            ),
            inserted AS (
                INSERT INTO follow_edges (follower_id, followee_id, created_at)
                SELECT $1, $2, $3
                WHERE NOT EXISTS (SELECT 1 FROM removed)
                ON CONFLICT (follower_id, followee_id) DO NOTHING
                RETURNING 1
            )
            SELECT EXISTS (SELECT 1 FROM inserted) OR NOT EXISTS (SELECT 1 FROM removed)
            "#,
        )
        .bind(edge.follower_id)
        .bind(edge.followee_id)
        .bind(edge.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(following)
    }

    async fn edge_exists(&self, follower_id: Uuid, followee_id: Uuid) -> SocialResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM follow_edges
                WHERE follower_id = $1 AND followee_id = $2
            )
            "#,
        )
        .bind(follower_id)
        .bind(followee_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn followers_of(
        &self,
        followee_id: Uuid,
        offset: usize,
        limit: usize,
    ) -> SocialResult<Vec<FollowEdge>> {
        let edges = sqlx::query_as::<_, FollowEdge>(
            r#"
            SELECT follower_id, followee_id, created_at
            FROM follow_edges
            WHERE followee_id = $1
            ORDER BY created_at DESC, follower_id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(followee_id)
        .bind(to_limit(limit))
        .bind(to_limit(offset))
        .fetch_all(&self.pool)
        .await?;
        Ok(edges)
    }

    async fn following_of(
        &self,
        follower_id: Uuid,
        offset: usize,
        limit: usize,
    ) -> SocialResult<Vec<FollowEdge>> {
        let edges = sqlx::query_as::<_, FollowEdge>(
            r#"
            SELECT follower_id, followee_id, created_at
            FROM follow_edges
            WHERE follower_id = $1
            ORDER BY created_at DESC, followee_id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(follower_id)
        .bind(to_limit(limit))
        .bind(to_limit(offset))
        .fetch_all(&self.pool)
        .await?;
        Ok(edges)
    }

    async fn all_follower_ids(&self, followee_id: Uuid) -> SocialResult<Vec<Uuid>> {
        self.edge_ids(
            "SELECT follower_id FROM follow_edges WHERE followee_id = $1 ORDER BY follower_id",
            followee_id,
        )
        .await
    }

    async fn all_following_ids(&self, follower_id: Uuid) -> SocialResult<Vec<Uuid>> {
        self.edge_ids(
            "SELECT followee_id FROM follow_edges WHERE follower_id = $1 ORDER BY followee_id",
            follower_id,
        )
        .await
    }

    async fn insert_content(&self, entity: ContentEntity) -> SocialResult<()> {
        let liked_by: Vec<Uuid> = entity.liked_by.into_iter().collect();
        sqlx::query(
            r#"
            INSERT INTO content_entities (id, kind, owner_id, title, liked_by, likes_count,
                                          comments_count, shares_count, is_public, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(entity.id)
        .bind(entity.kind.as_str())
        .bind(entity.owner_id)
        .bind(&entity.title)
        .bind(&liked_by)
        .bind(entity.likes_count)
        .bind(entity.comments_count)
        .bind(entity.shares_count)
        .bind(entity.is_public)
        .bind(entity.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_content(&self, kind: EntityKind, id: Uuid) -> SocialResult<Option<ContentEntity>> {
        let row = sqlx::query_as::<_, ContentRow>(&format!(
            "SELECT {CONTENT_COLUMNS} FROM content_entities WHERE id = $1 AND kind = $2"
        ))
        .bind(id)
        .bind(kind.as_str())
        .fetch_optional(&self.pool)
        .await?;
        row.map(ContentEntity::try_from).transpose()
    }

    async fn find_content(&self, id: Uuid) -> SocialResult<Option<ContentEntity>> {
        let row = sqlx::query_as::<_, ContentRow>(&format!(
            "SELECT {CONTENT_COLUMNS} FROM content_entities WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(ContentEntity::try_from).transpose()
    }

    async fn get_contents(&self, ids: &[Uuid]) -> SocialResult<Vec<ContentEntity>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, ContentRow>(&format!(
            "SELECT {CONTENT_COLUMNS} FROM content_entities WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        collect(rows)
    }

    async fn delete_content(&self, kind: EntityKind, id: Uuid) -> SocialResult<bool> {
        let result = sqlx::query("DELETE FROM content_entities WHERE id = $1 AND kind = $2")
            .bind(id)
            .bind(kind.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_visibility(
        &self,
        kind: EntityKind,
        id: Uuid,
        is_public: bool,
    ) -> SocialResult<bool> {
        let result =
            sqlx::query("UPDATE content_entities SET is_public = $3 WHERE id = $1 AND kind = $2")
                .bind(id)
                .bind(kind.as_str())
                .bind(is_public)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn toggle_like(
        &self,
        kind: EntityKind,
        id: Uuid,
        actor_id: Uuid,
    ) -> SocialResult<Option<LikeState>> {
        // SET expressions read the pre-update row; RETURNING reads the new one.
        let row: Option<(bool, i64)> = sqlx::query_as(
            r#"
            UPDATE content_entities
            SET liked_by = CASE WHEN $3 = ANY(liked_by)
                                THEN array_remove(liked_by, $3)
                                ELSE array_append(liked_by, $3) END,
                likes_count = CASE WHEN $3 = ANY(liked_by)
                                   THEN likes_count - 1
                                   ELSE likes_count + 1 END
            WHERE id = $1 AND kind = $2
            RETURNING $3 = ANY(liked_by), likes_count
            "#,
        )
        .bind(id)
        .bind(kind.as_str())
        .bind(actor_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(liked, likes_count)| LikeState { liked, likes_count }))
    }

    async fn adjust_comments_count(
        &self,
        kind: EntityKind,
        id: Uuid,
        delta: i64,
    ) -> SocialResult<Option<i64>> {
        let count: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE content_entities
            SET comments_count = GREATEST(comments_count + $3, 0)
            WHERE id = $1 AND kind = $2
            RETURNING comments_count
            "#,
        )
        .bind(id)
        .bind(kind.as_str())
        .bind(delta)
        .fetch_optional(&self.pool)
        .await?;
        Ok(count)
    }

    async fn increment_shares(&self, kind: EntityKind, id: Uuid) -> SocialResult<Option<i64>> {
        let count: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE content_entities
            SET shares_count = shares_count + 1
            WHERE id = $1 AND kind = $2
            RETURNING shares_count
            "#,
        )
        .bind(id)
        .bind(kind.as_str())
        .fetch_optional(&self.pool)
        .await?;
        Ok(count)
    }

    async fn reconcile_content_counters(
        &self,
        kind: EntityKind,
        id: Uuid,
        comments_count: i64,
    ) -> SocialResult<Option<(ContentCounters, ContentCounters)>> {
        let row: Option<(i64, i64, i64, i64)> = sqlx::query_as(
            r#"
            WITH before AS (
                SELECT id, likes_count, comments_count
                FROM content_entities
                WHERE id = $1 AND kind = $2
                FOR UPDATE
            )
            UPDATE content_entities c
            SET likes_count = cardinality(c.liked_by),
                comments_count = $3
            FROM before
            WHERE c.id = before.id
            RETURNING before.likes_count, before.comments_count, c.likes_count, c.comments_count
            "#,
        )
        .bind(id)
        .bind(kind.as_str())
        .bind(comments_count)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(likes_before, comments_before, likes_after, comments_after)| {
            (
                ContentCounters {
                    likes_count: likes_before,
                    comments_count: comments_before,
                },
                ContentCounters {
                    likes_count: likes_after,
                    comments_count: comments_after,
                },
            )
        }))
    }

    async fn recent_content(&self, query: &ContentQuery) -> SocialResult<Vec<ContentEntity>> {
        if query.owners.is_empty() || query.limit == 0 {
            return Ok(Vec::new());
        }
        let (before_at, before_id) = match query.before {
            Some((at, id)) => (Some(at), Some(id)),
            None => (None, None),
        };

        let rows = sqlx::query_as::<_, ContentRow>(&format!(
            r#"
            SELECT {CONTENT_COLUMNS}
            FROM content_entities
            WHERE kind = $1
              AND owner_id = ANY($2)
              AND (is_public OR owner_id = $3)
              AND ($4::timestamptz IS NULL OR (created_at, id) < ($4, $5::uuid))
            ORDER BY created_at DESC, id DESC
            LIMIT $6
            "#
        ))
        .bind(query.kind.as_str())
        .bind(&query.owners)
        .bind(query.viewer)
        .bind(before_at)
        .bind(before_id)
        .bind(to_limit(query.limit))
        .fetch_all(&self.pool)
        .await?;
        collect(rows)
    }

    async fn list_content_ids(
        &self,
        after: Option<Uuid>,
        limit: usize,
    ) -> SocialResult<Vec<(EntityKind, Uuid)>> {
        let rows: Vec<(String, Uuid)> = sqlx::query_as(
            r#"
            SELECT kind, id FROM content_entities
            WHERE ($1::uuid IS NULL OR id > $1)
            ORDER BY id ASC
            LIMIT $2
            "#,
        )
        .bind(after)
        .bind(to_limit(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(kind, id)| Ok((parse_kind(&kind)?, id)))
            .collect()
    }

    async fn insert_comment(&self, comment: Comment) -> SocialResult<Comment> {
        // Clamp against the latest comment on the entity; two inserts racing
        // on the same entity may still tie, and `seq` breaks the tie.
        let created_at: DateTime<Utc> = sqlx::query_scalar(
            r#"
            INSERT INTO comments (id, entity_kind, entity_id, author_id, body, created_at)
            SELECT $1, $2, $3, $4, $5, GREATEST($6::timestamptz, COALESCE(MAX(created_at), $6))
            FROM comments
            WHERE entity_id = $3
            RETURNING created_at
            "#,
        )
        .bind(comment.id)
        .bind(comment.entity_kind.as_str())
        .bind(comment.entity_id)
        .bind(comment.author_id)
        .bind(&comment.body)
        .bind(comment.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(Comment {
            created_at,
            ..comment
        })
    }

    async fn get_comment(&self, id: Uuid) -> SocialResult<Option<Comment>> {
        let row = sqlx::query_as::<_, CommentRow>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Comment::try_from).transpose()
    }

    async fn delete_comment(&self, id: Uuid) -> SocialResult<Option<Comment>> {
        let row = sqlx::query_as::<_, CommentRow>(&format!(
            "DELETE FROM comments WHERE id = $1 RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Comment::try_from).transpose()
    }

    async fn list_comments(
        &self,
        kind: EntityKind,
        entity_id: Uuid,
        offset: usize,
        limit: usize,
    ) -> SocialResult<Vec<Comment>> {
        let rows = sqlx::query_as::<_, CommentRow>(&format!(
            r#"
            SELECT {COMMENT_COLUMNS}
            FROM comments
            WHERE entity_id = $1 AND entity_kind = $2
            ORDER BY created_at ASC, seq ASC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(entity_id)
        .bind(kind.as_str())
        .bind(to_limit(limit))
        .bind(to_limit(offset))
        .fetch_all(&self.pool)
        .await?;
        collect(rows)
    }

    async fn count_comments(&self, kind: EntityKind, entity_id: Uuid) -> SocialResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM comments WHERE entity_id = $1 AND entity_kind = $2",
        )
        .bind(entity_id)
        .bind(kind.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn delete_comments_for(&self, kind: EntityKind, entity_id: Uuid) -> SocialResult<u64> {
        let result = sqlx::query("DELETE FROM comments WHERE entity_id = $1 AND entity_kind = $2")
            .bind(entity_id)
            .bind(kind.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn health_check(&self) -> SocialResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Database health check failed")?;
        Ok(())
    }
}
