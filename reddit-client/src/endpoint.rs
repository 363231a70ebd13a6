//! Static table of the API operations this client knows how to call.

use redwatch_core::{CoreError, Credentials};
use reqwest::Method;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Host {
    /// `oauth.<domain>`, bearer-authenticated API calls.
    OAuth,
    /// `www.<domain>`, token issuance and revocation.
    Www,
}

impl Host {
    pub fn resolve(&self, credentials: &Credentials) -> String {
        match self {
            Host::OAuth => credentials.oauth_host(),
            Host::Www => credentials.www_host(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    AccessToken,
    RevokeToken,
    Me,
    MySubscriptions,
    FrontPage,
    SubredditAbout,
    SubredditHot,
    SubredditNew,
    SubredditTop,
    SubredditRising,
    SubredditControversial,
    SubredditComments,
    SubredditSearch,
    Comments,
    UserAbout,
    UserSubmitted,
    UserComments,
}

struct Descriptor {
    path: &'static str,
    host: Host,
    method: Method,
}

impl Endpoint {
    fn descriptor(&self) -> Descriptor {
        let (path, host, method) = match self {
            Endpoint::AccessToken => ("/api/v1/access_token", Host::Www, Method::POST),
            Endpoint::RevokeToken => ("/api/v1/revoke_token", Host::Www, Method::POST),
            Endpoint::Me => ("/api/v1/me", Host::OAuth, Method::GET),
            Endpoint::MySubscriptions => ("/subreddits/mine/subscriber", Host::OAuth, Method::GET),
            Endpoint::FrontPage => ("/", Host::OAuth, Method::GET),
            Endpoint::SubredditAbout => ("/r/{}/about", Host::OAuth, Method::GET),
            Endpoint::SubredditHot => ("/r/{}/hot", Host::OAuth, Method::GET),
            Endpoint::SubredditNew => ("/r/{}/new", Host::OAuth, Method::GET),
            Endpoint::SubredditTop => ("/r/{}/top", Host::OAuth, Method::GET),
            Endpoint::SubredditRising => ("/r/{}/rising", Host::OAuth, Method::GET),
            Endpoint::SubredditControversial => {
                ("/r/{}/controversial", Host::OAuth, Method::GET)
            }
            Endpoint::SubredditComments => ("/r/{}/comments", Host::OAuth, Method::GET),
            Endpoint::SubredditSearch => ("/r/{}/search", Host::OAuth, Method::GET),
            Endpoint::Comments => ("/comments/{}", Host::OAuth, Method::GET),
            Endpoint::UserAbout => ("/user/{}/about", Host::OAuth, Method::GET),
            Endpoint::UserSubmitted => ("/user/{}/submitted", Host::OAuth, Method::GET),
            Endpoint::UserComments => ("/user/{}/comments", Host::OAuth, Method::GET),
        };
        Descriptor { path, host, method }
    }

    pub fn path_template(&self) -> &'static str {
        self.descriptor().path
    }

    pub fn host(&self) -> Host {
        self.descriptor().host
    }

    pub fn method(&self) -> Method {
        self.descriptor().method
    }

    /// Endpoints that act on the logged-in account.
    pub fn requires_user(&self) -> bool {
        matches!(self, Endpoint::Me | Endpoint::MySubscriptions)
    }

    pub fn arity(&self) -> usize {
        self.path_template().matches("{}").count()
    }

    /// Fills the `{}` placeholders of the path template in order.
    pub fn resolve(&self, args: &[String]) -> Result<String, CoreError> {
        let template = self.path_template();
        if args.len() != self.arity() {
            return Err(CoreError::InvalidInput {
                message: format!(
                    "{:?} expects {} argument(s), got {}",
                    self,
                    self.arity(),
                    args.len()
                ),
            });
        }

        let mut path = String::with_capacity(template.len() + 16);
        let mut pieces = template.split("{}");
        if let Some(first) = pieces.next() {
            path.push_str(first);
        }
        for (piece, arg) in pieces.zip(args) {
            validate_segment(arg)?;
            path.push_str(arg);
            path.push_str(piece);
        }
        Ok(path)
    }
}

fn validate_segment(arg: &str) -> Result<(), CoreError> {
    if arg.is_empty() || arg.contains(['/', '?', '#']) || arg.contains(char::is_whitespace) {
        return Err(CoreError::InvalidInput {
            message: format!("invalid path argument '{}'", arg),
        });
    }
    Ok(())
}
