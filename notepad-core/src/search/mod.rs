//! 検索・置換モジュール
//!
//! テキストバッファ上のインクリメンタル検索・置換を提供する。
//! セッション中のバッファはマッチを `[term]` で囲んだ表示用テキストに書き換えられるが、
//! 本来の内容は常にセッションの復元用テキストが保持する。

mod matcher;
mod state;
pub mod types;

use log::{debug, trace};

use crate::buffer::text_buffer::{char_to_byte_index, slice_chars};
use crate::buffer::{Selection, TextBuffer};
pub use matcher::{LiteralMatcher, StringMatcher};
use state::{highlight_selection, unbracketed_offset, SearchSession};

pub use types::{
    EngineState, FindOutcome, MatchSpan, NoOpReason, ReplaceOutcome, SessionMode,
    SessionTransition,
};

/// 検索・置換の制御インターフェース
#[derive(Debug, Default)]
pub struct FindReplaceEngine<M: StringMatcher = LiteralMatcher> {
    matcher: M,
    session: Option<SearchSession>,
}

impl FindReplaceEngine<LiteralMatcher> {
    /// 既定のリテラルマッチャーで作成
    pub fn new() -> Self {
        Self::with_matcher(LiteralMatcher::new())
    }
}

impl<M: StringMatcher> FindReplaceEngine<M> {
    /// マッチャーを差し替えて作成
    pub fn with_matcher(matcher: M) -> Self {
        Self {
            matcher,
            session: None,
        }
    }

    /// 現在の状態
    pub fn state(&self) -> EngineState {
        match &self.session {
            None => EngineState::Closed,
            Some(session) if session.highlighted => EngineState::MatchDisplayed,
            Some(_) => EngineState::SessionOpen,
        }
    }

    /// セッションが開いているか判定
    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// 開いているUIの種類
    pub fn mode(&self) -> Option<SessionMode> {
        self.session.as_ref().map(|s| s.mode)
    }

    /// 直近のマッチ範囲（括弧なし）
    pub fn match_span(&self) -> Option<MatchSpan> {
        self.session.as_ref().and_then(|s| s.span)
    }

    /// 検索へ切り替わった置換の置換文字列
    pub fn pending_replacement(&self) -> Option<&str> {
        self.session
            .as_ref()
            .and_then(|s| s.pending_replacement.as_deref())
    }

    /// 復元用テキスト（セッション中のみ）
    pub fn restore_text(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.restore_text.as_str())
    }

    /// 本来の文書内容を取得する
    ///
    /// セッション中はハイライト注釈を含まない復元用テキストを返す。
    pub fn document_text<'a>(&'a self, buffer: &'a TextBuffer) -> &'a str {
        self.restore_text().unwrap_or_else(|| buffer.content())
    }

    /// 検索UIを開く（検索UIが開いていれば閉じる）
    pub fn open_find(&mut self, buffer: &mut TextBuffer) -> SessionTransition {
        self.toggle(buffer, SessionMode::Find)
    }

    /// 置換UIを開く（置換UIが開いていれば閉じる）
    pub fn open_replace(&mut self, buffer: &mut TextBuffer) -> SessionTransition {
        self.toggle(buffer, SessionMode::Replace)
    }

    /// セッションを閉じ、バッファを復元する
    ///
    /// セッションがなければ何もせず `false` を返す。
    pub fn close_session(&mut self, buffer: &mut TextBuffer) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };
        trace!("search session closed ({:?})", session.mode);
        buffer.replace_with(session.restore_text, session.restore_selection);
        true
    }

    /// 検索UIからフォーカスが外れた
    pub fn focus_lost(&mut self, buffer: &mut TextBuffer) -> bool {
        self.close_session(buffer)
    }

    /// バッファを復元せずにセッションを破棄する（文書差し替え時）
    pub fn discard(&mut self) {
        if self.session.take().is_some() {
            trace!("search session discarded");
        }
    }

    /// 直接編集された表示用テキストからハイライト注釈を取り除く
    ///
    /// `selection` は編集後の内容上の範囲。ハイライト表示中でなければそのまま返す。
    /// 注釈 `[term]` が編集の前後どちらかに無傷で残っていればそれを外し、
    /// 選択範囲も括弧なしの座標に移す。注釈自体が編集で崩れていれば `None`。
    pub fn unannotate(&self, content: &str, selection: Selection) -> Option<(String, Selection)> {
        let highlighted = self
            .session
            .as_ref()
            .filter(|session| session.highlighted)
            .and_then(|session| session.span.map(|span| (session, span)));
        let Some((session, span)) = highlighted else {
            return Some((content.to_string(), selection));
        };

        let term = slice_chars(&session.restore_text, span.start, span.end);
        let marker = format!("[{term}]");
        let marker_len = span.len() + 2;
        let len = content.chars().count();
        // 注釈より後ろの文字数（表示用テキスト上）
        let tail = session.restore_len - span.end;

        let anchored_front = Some(span.start);
        let anchored_back = len.checked_sub(tail + marker_len);
        let marker_start = [anchored_front, anchored_back]
            .into_iter()
            .flatten()
            .find(|&start| {
                start + marker_len <= len && slice_chars(content, start, start + marker_len) == marker
            })?;

        let mut text = String::with_capacity(content.len());
        text.push_str(slice_chars(content, 0, marker_start));
        text.push_str(term);
        text.push_str(slice_chars(content, marker_start + marker_len, len));

        let unbracket = |offset| unbracketed_offset(offset, marker_start, span.len());
        let selection = Selection::new(unbracket(selection.start), unbracket(selection.end));
        Some((text, selection))
    }

    /// 検索する
    pub fn find(&mut self, buffer: &mut TextBuffer, term: &str) -> FindOutcome {
        let Some(session) = self.session.as_mut() else {
            debug!("find ignored: no search session");
            return FindOutcome::Skipped(NoOpReason::NoSession);
        };
        if term.is_empty() {
            debug!("find ignored: empty term");
            return FindOutcome::Skipped(NoOpReason::EmptyTerm);
        }
        if session.restore_text.is_empty() {
            debug!("find ignored: empty document");
            return FindOutcome::Skipped(NoOpReason::EmptyDocument);
        }

        let origin = session.search_origin(buffer.selection());
        match self.matcher.find_first(&session.restore_text, term, origin) {
            Some(span) => {
                let annotated = bracket_match(&session.restore_text, span, term);
                session.span = Some(span);
                session.highlighted = true;
                buffer.replace_with(annotated, highlight_selection(span));
                trace!("find {:?} from {} matched {:?}", term, origin, span);
                FindOutcome::Found(span)
            }
            None => {
                session.clear_match();
                buffer.replace_with(session.restore_text.clone(), Selection::default());
                trace!("find {:?} from {} not found", term, origin);
                FindOutcome::NotFound
            }
        }
    }

    /// 確定済みのマッチを置換する
    ///
    /// マッチ範囲が記録されていない、空である、または復元用テキスト上の
    /// その範囲が `term` と一致しない場合は置換せずに `term` で検索する。
    pub fn replace(
        &mut self,
        buffer: &mut TextBuffer,
        term: &str,
        replacement: &str,
    ) -> ReplaceOutcome {
        let Some(session) = self.session.as_mut() else {
            debug!("replace ignored: no search session");
            return ReplaceOutcome::Skipped(NoOpReason::NoSession);
        };

        let confirmed = session.span.filter(|span| {
            !span.is_empty() && slice_chars(&session.restore_text, span.start, span.end) == term
        });
        let Some(span) = confirmed else {
            debug!(
                "replace target mismatch for {:?} (span {:?}); searching instead",
                term, session.span
            );
            session.pending_replacement = Some(replacement.to_string());
            return ReplaceOutcome::Searched(self.find(buffer, term));
        };

        let text = &session.restore_text;
        let mut replaced = String::with_capacity(text.len() + replacement.len());
        replaced.push_str(slice_chars(text, 0, span.start));
        replaced.push_str(replacement);
        replaced.push_str(slice_chars(text, span.end, session.restore_len));

        let caret = span.start + replacement.chars().count();
        session.commit(replaced.clone(), caret);
        buffer.replace_with(replaced, Selection::collapsed(caret));
        trace!("replaced {:?} at {:?} with {:?}", term, span, replacement);

        ReplaceOutcome::Replaced {
            inserted: MatchSpan::new(span.start, caret),
        }
    }

    fn toggle(&mut self, buffer: &mut TextBuffer, mode: SessionMode) -> SessionTransition {
        match self.mode() {
            None => {
                self.session = Some(SearchSession::snapshot(
                    mode,
                    buffer.content(),
                    buffer.selection(),
                ));
                trace!("search session opened ({mode:?})");
                SessionTransition::Opened(mode)
            }
            Some(current) if current == mode => {
                self.close_session(buffer);
                SessionTransition::Closed
            }
            Some(_) => {
                if let Some(session) = self.session.as_mut() {
                    session.mode = mode;
                }
                SessionTransition::Switched(mode)
            }
        }
    }
}

/// マッチ部分を `[term]` で囲んだ表示用テキストを作る
fn bracket_match(text: &str, span: MatchSpan, term: &str) -> String {
    let mut annotated = String::with_capacity(text.len() + term.len() + 2);
    annotated.push_str(slice_chars(text, 0, span.start));
    annotated.push('[');
    annotated.push_str(term);
    annotated.push(']');
    annotated.push_str(&text[char_to_byte_index(text, span.end)..]);
    annotated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(text: &str) -> (FindReplaceEngine, TextBuffer) {
        let mut buffer = TextBuffer::from_str(text);
        let mut engine = FindReplaceEngine::new();
        engine.open_find(&mut buffer);
        (engine, buffer)
    }

    #[test]
    fn find_starts_from_caret_moved_off_the_highlight() {
        let (mut engine, mut buffer) = open("foo bar foo bar");
        engine.find(&mut buffer, "bar");
        buffer.set_selection(0, 0).unwrap();

        let outcome = engine.find(&mut buffer, "foo");
        assert_eq!(outcome, FindOutcome::Found(MatchSpan::new(0, 3)));
        assert_eq!(buffer.content(), "[foo] bar foo bar");
    }

    #[test]
    fn unannotate_strips_marker_after_edit_behind_it() {
        let (mut engine, mut buffer) = open("foo bar foo");
        engine.find(&mut buffer, "bar");
        // 表示 "foo [bar] foo" の末尾に追記
        let (text, selection) = engine
            .unannotate("foo [bar] food", Selection::collapsed(14))
            .unwrap();
        assert_eq!(text, "foo bar food");
        assert_eq!(selection, Selection::collapsed(12));
    }

    #[test]
    fn unannotate_strips_marker_after_edit_in_front_of_it() {
        let (mut engine, mut buffer) = open("foo bar foo");
        engine.find(&mut buffer, "bar");
        let (text, selection) = engine
            .unannotate("a foo [bar] foo", Selection::collapsed(1))
            .unwrap();
        assert_eq!(text, "a foo bar foo");
        assert_eq!(selection, Selection::collapsed(1));
    }

    #[test]
    fn unannotate_rejects_broken_marker() {
        let (mut engine, mut buffer) = open("foo bar foo");
        engine.find(&mut buffer, "bar");
        assert!(engine
            .unannotate("foo [bax] foo", Selection::collapsed(0))
            .is_none());
    }

    #[test]
    fn unannotate_passes_through_without_highlight() {
        let (engine, _buffer) = open("foo [x]");
        let (text, selection) = engine
            .unannotate("foo [x]!", Selection::collapsed(8))
            .unwrap();
        assert_eq!(text, "foo [x]!");
        assert_eq!(selection, Selection::collapsed(8));
    }

    #[test]
    fn find_brackets_the_match() {
        let (mut engine, mut buffer) = open("foo bar foo");
        let outcome = engine.find(&mut buffer, "bar");
        assert_eq!(outcome, FindOutcome::Found(MatchSpan::new(4, 7)));
        assert_eq!(buffer.content(), "foo [bar] foo");
        assert_eq!(buffer.selection().as_tuple(), (4, 9));
        assert_eq!(engine.state(), EngineState::MatchDisplayed);
        assert_eq!(engine.restore_text(), Some("foo bar foo"));
    }

    #[test]
    fn find_wraps_from_end_of_document() {
        let mut buffer = TextBuffer::from_str("abcabc");
        buffer.set_selection(6, 6).unwrap();
        let mut engine = FindReplaceEngine::new();
        engine.open_find(&mut buffer);

        assert_eq!(engine.find(&mut buffer, "a"), FindOutcome::Found(MatchSpan::new(0, 1)));
    }

    #[test]
    fn repeated_find_walks_through_matches_then_wraps() {
        let (mut engine, mut buffer) = open("abcabc");
        assert_eq!(engine.find(&mut buffer, "c").span(), Some(MatchSpan::new(2, 3)));
        assert_eq!(engine.find(&mut buffer, "c").span(), Some(MatchSpan::new(5, 6)));
        assert_eq!(buffer.content(), "abcab[c]");
        assert_eq!(engine.find(&mut buffer, "c").span(), Some(MatchSpan::new(2, 3)));
    }

    #[test]
    fn find_not_found_restores_and_collapses() {
        let (mut engine, mut buffer) = open("hello");
        engine.find(&mut buffer, "ll");
        assert_eq!(engine.find(&mut buffer, "z"), FindOutcome::NotFound);
        assert_eq!(buffer.content(), "hello");
        assert_eq!(buffer.selection().as_tuple(), (0, 0));
        assert_eq!(engine.state(), EngineState::SessionOpen);
    }

    #[test]
    fn find_is_noop_for_empty_term_or_document() {
        let (mut engine, mut buffer) = open("");
        assert_eq!(
            engine.find(&mut buffer, "a"),
            FindOutcome::Skipped(NoOpReason::EmptyDocument)
        );

        let (mut engine, mut buffer) = open("text");
        assert_eq!(
            engine.find(&mut buffer, ""),
            FindOutcome::Skipped(NoOpReason::EmptyTerm)
        );
        assert_eq!(buffer.content(), "text");
    }

    #[test]
    fn find_without_session_is_noop() {
        let mut buffer = TextBuffer::from_str("text");
        let mut engine = FindReplaceEngine::new();
        assert_eq!(
            engine.find(&mut buffer, "t"),
            FindOutcome::Skipped(NoOpReason::NoSession)
        );
        assert_eq!(buffer.content(), "text");
    }

    #[test]
    fn replace_without_match_searches_instead() {
        let mut buffer = TextBuffer::from_str("foo bar foo");
        let mut engine = FindReplaceEngine::new();
        engine.open_replace(&mut buffer);

        let outcome = engine.replace(&mut buffer, "bar", "baz");
        assert_eq!(
            outcome,
            ReplaceOutcome::Searched(FindOutcome::Found(MatchSpan::new(4, 7)))
        );
        assert_eq!(buffer.content(), "foo [bar] foo");
        assert_eq!(engine.pending_replacement(), Some("baz"));
    }

    #[test]
    fn replace_commits_confirmed_match() {
        let (mut engine, mut buffer) = open("foo bar foo");
        engine.find(&mut buffer, "bar");

        let outcome = engine.replace(&mut buffer, "bar", "baz");
        assert_eq!(
            outcome,
            ReplaceOutcome::Replaced {
                inserted: MatchSpan::new(4, 7)
            }
        );
        assert_eq!(buffer.content(), "foo baz foo");
        assert_eq!(buffer.selection().as_tuple(), (7, 7));
        assert_eq!(engine.restore_text(), Some("foo baz foo"));
        assert_eq!(engine.match_span(), Some(MatchSpan::new(7, 7)));
        assert_eq!(engine.state(), EngineState::SessionOpen);
    }

    #[test]
    fn replace_with_different_term_searches_for_new_term() {
        let (mut engine, mut buffer) = open("foo bar foo");
        engine.find(&mut buffer, "bar");

        let outcome = engine.replace(&mut buffer, "foo", "x");
        assert_eq!(
            outcome,
            ReplaceOutcome::Searched(FindOutcome::Found(MatchSpan::new(8, 11)))
        );
        assert_eq!(buffer.content(), "foo bar [foo]");
    }

    #[test]
    fn replace_is_exact_and_case_sensitive() {
        let (mut engine, mut buffer) = open("Bar bar");
        engine.find(&mut buffer, "bar");
        let outcome = engine.replace(&mut buffer, "Bar", "x");
        assert!(matches!(outcome, ReplaceOutcome::Searched(_)));
        assert_eq!(engine.restore_text(), Some("Bar bar"));
    }

    #[test]
    fn close_after_replace_keeps_new_baseline() {
        let (mut engine, mut buffer) = open("one two one");
        engine.find(&mut buffer, "one");
        engine.replace(&mut buffer, "one", "1");
        assert!(engine.close_session(&mut buffer));
        assert_eq!(buffer.content(), "1 two one");
        assert_eq!(buffer.selection().as_tuple(), (1, 1));
    }

    #[test]
    fn toggling_same_mode_restores_original() {
        let mut buffer = TextBuffer::from_str("foo bar foo");
        buffer.set_selection(1, 2).unwrap();
        let mut engine = FindReplaceEngine::new();

        assert_eq!(
            engine.open_find(&mut buffer),
            SessionTransition::Opened(SessionMode::Find)
        );
        engine.find(&mut buffer, "bar");
        assert_eq!(engine.open_find(&mut buffer), SessionTransition::Closed);

        assert_eq!(buffer.content(), "foo bar foo");
        assert_eq!(buffer.selection().as_tuple(), (1, 2));
        assert_eq!(engine.state(), EngineState::Closed);
    }

    #[test]
    fn switching_mode_keeps_session() {
        let (mut engine, mut buffer) = open("foo bar");
        engine.find(&mut buffer, "bar");
        assert_eq!(
            engine.open_replace(&mut buffer),
            SessionTransition::Switched(SessionMode::Replace)
        );
        assert_eq!(engine.mode(), Some(SessionMode::Replace));
        assert_eq!(buffer.content(), "foo [bar]");
    }

    #[test]
    fn document_text_ignores_highlight() {
        let (mut engine, mut buffer) = open("foo bar");
        engine.find(&mut buffer, "bar");
        assert_eq!(engine.document_text(&buffer), "foo bar");
        engine.close_session(&mut buffer);
        assert_eq!(engine.document_text(&buffer), "foo bar");
    }

    #[test]
    fn find_handles_multibyte_text() {
        let (mut engine, mut buffer) = open("日本語のテキスト");
        assert_eq!(engine.find(&mut buffer, "テキ").span(), Some(MatchSpan::new(4, 6)));
        assert_eq!(buffer.content(), "日本語の[テキ]スト");
        assert_eq!(buffer.selection().as_tuple(), (4, 8));
    }
}
