//! Permission names and resources checked before each method

use courier_core::domain::{IdKind, NAMESPACE};
use std::fmt;

/// Action a caller asks to perform; rendered as `msg::<Action>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateQueue,
    DeleteQueue,
    DescribeQueues,
    PushMessage,
    PopMessage,
    DescribeQueueStatus,
    PurgeQueue,
    UpdateQueueTags,
    GetMetrics,
}

impl Action {
    fn name(&self) -> &'static str {
        match self {
            Action::CreateQueue => "CreateQueue",
            Action::DeleteQueue => "DeleteQueue",
            Action::DescribeQueues => "DescribeQueues",
            Action::PushMessage => "PushMessage",
            Action::PopMessage => "PopMessage",
            Action::DescribeQueueStatus => "DescribeQueueStatus",
            Action::PurgeQueue => "PurgeQueue",
            Action::UpdateQueueTags => "UpdateQueueTags",
            Action::GetMetrics => "GetMetrics",
        }
    }

    pub fn permission(&self) -> String {
        format!("{}::{}", NAMESPACE, self.name())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", NAMESPACE, self.name())
    }
}

/// Resource for actions that are not scoped to one queue
pub fn all_queues() -> String {
    format!("{}*", IdKind::Queue.prefix())
}

pub fn metrics_resource() -> String {
    format!("{}:metrics", NAMESPACE)
}
