use anyhow::{anyhow, Context as _, Result};
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::Services;
use crate::store::SessionStore;
use crate::types::{ChatSession, Coordinates, HistoricalContext};

/// 当前正在探索的地点
#[derive(Debug, Clone, PartialEq)]
pub struct Exploration {
    pub context: HistoricalContext,
    pub location: Coordinates,
    pub radius: f64,
    /// 该地点已有的问答记录，只在 open 时取回
    pub transcript: Vec<Value>,
}

impl Exploration {
    pub fn session_id(&self) -> &str {
        &self.context.session_id
    }

    pub fn main_location(&self) -> &str {
        &self.context.main_location
    }
}

/// 前端用的门面：持有服务、会话状态和当前探索
pub struct Explorer {
    services: Services,
    session: SessionStore,
    current: Option<Exploration>,
}

impl Explorer {
    pub fn new(services: Services, session: SessionStore) -> Self {
        Explorer {
            services,
            session,
            current: None,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionStore {
        &mut self.session
    }

    pub fn current(&self) -> Option<&Exploration> {
        self.current.as_ref()
    }

    fn user_id(&self) -> Result<String> {
        self.session
            .user_id()
            .map(str::to_string)
            .ok_or_else(|| anyhow!("请先登录"))
    }

    fn current_session_id(&self) -> Result<String> {
        self.current
            .as_ref()
            .map(|e| e.session_id().to_string())
            .ok_or_else(|| anyhow!("当前没有探索中的地点，先用 /explore"))
    }

    /// 生成地点的历史背景，并把这次会话记入账本
    pub async fn explore(&mut self, location: Coordinates, radius: f64) -> Result<&Exploration> {
        let user_id = self.user_id()?;

        let context = self
            .services
            .history
            .generate_context(&user_id, location, radius)
            .await
            .context("生成历史背景失败")?;
        debug!(session_id = %context.session_id, main_location = %context.main_location, "context generated");

        let recorded = self
            .services
            .chat
            .record_chat(
                &context.session_id,
                &user_id,
                location,
                radius,
                &context.main_location,
            )
            .await;

        if let Err(e) = recorded {
            // 没进账本的 agent 会话不会再被访问，顺手清掉
            if let Err(clear_err) = self
                .services
                .history
                .clear_session(&context.session_id, &user_id)
                .await
            {
                warn!(session_id = %context.session_id, error = %clear_err, "orphaned agent session");
            }
            return Err(anyhow::Error::new(e).context("记录会话失败"));
        }

        Ok(&*self.current.insert(Exploration {
            context,
            location,
            radius,
            transcript: Vec::new(),
        }))
    }

    /// 在当前探索中提问
    pub async fn ask(&self, question: &str) -> Result<String> {
        let user_id = self.user_id()?;
        let session_id = self.current_session_id()?;

        let answer = self
            .services
            .history
            .answer_question(&session_id, &user_id, question)
            .await?;
        Ok(answer)
    }

    /// 清除当前探索的对话记忆
    pub async fn clear(&mut self) -> Result<()> {
        let user_id = self.user_id()?;
        let session_id = self.current_session_id()?;

        self.services
            .history
            .clear_session(&session_id, &user_id)
            .await?;
        self.current = None;
        Ok(())
    }

    pub async fn chats(&self) -> Result<Vec<ChatSession>> {
        let user_id = self.user_id()?;
        Ok(self.services.chat.get_user_chats(&user_id).await?)
    }

    /// 回到一个已记录的会话，继续使用账本中的 agent 会话
    ///
    /// 账本不保存叙述文本，`context.context` 为空；已有问答放在 `transcript`。
    pub async fn open(&mut self, session_id: &str) -> Result<&Exploration> {
        let user_id = self.user_id()?;
        let chat = self.services.chat.get_chat(session_id, &user_id).await?;

        let transcript = self
            .services
            .history
            .get_chat(&user_id, &chat.main_location)
            .await
            .context("读取问答记录失败")?;
        debug!(session_id = %chat.session_id, entries = transcript.len(), "reopened chat");

        Ok(&*self.current.insert(Exploration {
            context: HistoricalContext {
                context: String::new(),
                main_location: chat.main_location,
                session_id: chat.session_id,
            },
            location: chat.location,
            radius: chat.radius,
            transcript,
        }))
    }

    /// 某地点的历史问答记录
    pub async fn history(&self, main_location: &str) -> Result<Vec<Value>> {
        let user_id = self.user_id()?;
        Ok(self
            .services
            .history
            .get_chat(&user_id, main_location)
            .await?)
    }

    pub fn logout(&mut self) {
        self.current = None;
        self.session.logout();
    }
}
